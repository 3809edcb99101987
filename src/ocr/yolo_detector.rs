// YOLOv8 slip detector running an exported ONNX model through OpenCV DNN

use super::{Detection, SlipDetector};
use crate::config::DetectorConfig;
use anyhow::{Result, bail};
use log::{debug, info};
use opencv::{
    core::{self, Mat, Rect, Scalar, Size, Vector},
    dnn::{self, Net},
    imgproc,
    prelude::*,
};

pub struct YoloSlipDetector {
    net: Net,
    labels: Vec<String>,
    input_size: i32,
    confidence_threshold: f32,
    nms_threshold: f32,
    swap_rb: bool,
}

impl YoloSlipDetector {
    pub fn new(config: &DetectorConfig) -> Result<Self> {
        let Some(model_path) = config.model_path.to_str() else {
            bail!("Model path is not UTF-8: {}", config.model_path.display());
        };
        if !config.model_path.is_file() {
            bail!("Detection model not found at {}", model_path);
        }

        let net = dnn::read_net_from_onnx(model_path)?;
        if net.empty()? {
            bail!("Failed to load detection model from {}", model_path);
        }
        info!(
            "Loaded detection model {} ({} classes)",
            model_path,
            config.labels.len()
        );

        Ok(Self {
            net,
            labels: config.labels.clone(),
            input_size: config.input_size,
            confidence_threshold: config.confidence_threshold,
            nms_threshold: config.nms_threshold,
            swap_rb: config.swap_rb,
        })
    }

    fn label(&self, class_id: usize) -> String {
        self.labels
            .get(class_id)
            .cloned()
            .unwrap_or_else(|| format!("class_{class_id}"))
    }
}

impl SlipDetector for YoloSlipDetector {
    fn detect(&mut self, img: &Mat) -> Result<Vec<Detection>> {
        let bgr = if img.channels() == 1 {
            let mut bgr = Mat::default();
            imgproc::cvt_color_def(img, &mut bgr, imgproc::COLOR_GRAY2BGR)?;
            bgr
        } else {
            img.try_clone()?
        };

        let blob = dnn::blob_from_image(
            &bgr,
            1.0 / 255.0,
            Size::new(self.input_size, self.input_size),
            Scalar::default(),
            self.swap_rb,
            false,
            core::CV_32F,
        )?;
        self.net.set_input(&blob, "", 1.0, Scalar::default())?;
        let output = self.net.forward_single("")?;

        // [1, 4 + classes, anchors] -> (4 + classes) x anchors
        let rows = 4 + self.labels.len() as i32;
        let predictions = output.reshape(1, rows)?.try_clone()?;
        if predictions.rows() != rows {
            bail!(
                "Unexpected detector output: {} rows for {} labels",
                predictions.rows(),
                self.labels.len()
            );
        }

        let x_factor = bgr.cols() as f32 / self.input_size as f32;
        let y_factor = bgr.rows() as f32 / self.input_size as f32;

        let mut boxes: Vector<Rect> = Vector::new();
        let mut scores: Vector<f32> = Vector::new();
        let mut class_ids = Vec::new();

        for anchor in 0..predictions.cols() {
            let mut best_class = 0usize;
            let mut best_score = f32::MIN;
            for class_id in 0..self.labels.len() {
                let score = *predictions.at_2d::<f32>(4 + class_id as i32, anchor)?;
                if score > best_score {
                    best_score = score;
                    best_class = class_id;
                }
            }
            if best_score < self.confidence_threshold {
                continue;
            }

            let cx = *predictions.at_2d::<f32>(0, anchor)?;
            let cy = *predictions.at_2d::<f32>(1, anchor)?;
            let w = *predictions.at_2d::<f32>(2, anchor)?;
            let h = *predictions.at_2d::<f32>(3, anchor)?;

            boxes.push(Rect::new(
                ((cx - w / 2.0) * x_factor) as i32,
                ((cy - h / 2.0) * y_factor) as i32,
                (w * x_factor) as i32,
                (h * y_factor) as i32,
            ));
            scores.push(best_score);
            class_ids.push(best_class);
        }

        let mut keep: Vector<i32> = Vector::new();
        dnn::nms_boxes_def(
            &boxes,
            &scores,
            self.confidence_threshold,
            self.nms_threshold,
            &mut keep,
        )?;

        let mut detections = Vec::with_capacity(keep.len());
        for index in keep {
            let index = index as usize;
            detections.push(Detection {
                label: self.label(class_ids[index]),
                confidence: scores.get(index)?,
                bbox: boxes.get(index)?,
            });
        }
        detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        debug!("Detector kept {} of {} candidates", detections.len(), boxes.len());
        Ok(detections)
    }
}
