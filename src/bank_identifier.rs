use crate::bank::BankIdentity;
use crate::config::IdentifierConfig;
use crate::preprocess;
use log::{debug, info, warn};
use opencv::{
    core::{self, DMatch, KeyPoint, Mat, Point, Ptr, Size, Vector},
    features2d::{FlannBasedMatcher, SIFT},
    imgcodecs::{self, IMREAD_GRAYSCALE},
    imgproc,
    prelude::*,
};
use std::fs;
use std::path::{Path, PathBuf};

/// One logo image, kept in raw grayscale.
pub struct BankTemplate {
    pub path: PathBuf,
    pub image: Mat,
}

/// All logos filed under one bank directory.
pub struct TemplateGroup {
    pub name: String,
    pub identity: BankIdentity,
    pub templates: Vec<BankTemplate>,
}

/// Logo templates grouped by bank, in the order they are searched.
#[derive(Default)]
pub struct TemplateLibrary {
    groups: Vec<TemplateGroup>,
}

impl TemplateLibrary {
    /// Read `root/<bank>/<logo image>`. Directories and files are sorted by name
    /// so the search order does not depend on the platform. A missing root or
    /// an unreadable logo is logged and skipped.
    pub fn load(root: &Path) -> Self {
        let mut library = Self::default();

        let Some(group_dirs) = sorted_entries(root) else {
            warn!("Template library {} not found, bank identification disabled", root.display());
            return library;
        };

        for group_dir in group_dirs.into_iter().filter(|p| p.is_dir()) {
            let name = group_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            for file in sorted_entries(&group_dir).unwrap_or_default() {
                if !file.is_file() {
                    continue;
                }
                match read_template(&file) {
                    Ok(image) => library.add_template(&name, file, image),
                    Err(e) => warn!("Skipping template {}: {}", file.display(), e),
                }
            }
        }

        if library.is_empty() {
            warn!("Template library {} holds no templates", root.display());
        } else {
            info!(
                "Loaded {} templates in {} bank groups from {}",
                library.template_count(),
                library.groups.len(),
                root.display()
            );
        }
        library
    }

    /// Append a template to `group`, creating the group at the end if needed.
    pub fn add_template(&mut self, group: &str, path: PathBuf, image: Mat) {
        let template = BankTemplate { path, image };
        match self.groups.iter_mut().find(|g| g.name == group) {
            Some(existing) => existing.templates.push(template),
            None => self.groups.push(TemplateGroup {
                name: group.to_string(),
                identity: BankIdentity::from_alias(group),
                templates: vec![template],
            }),
        }
    }

    pub fn groups(&self) -> &[TemplateGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.templates.is_empty())
    }

    pub fn template_count(&self) -> usize {
        self.groups.iter().map(|g| g.templates.len()).sum()
    }
}

fn sorted_entries(dir: &Path) -> Option<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();
    Some(entries)
}

fn read_template(path: &Path) -> anyhow::Result<Mat> {
    let path_str = path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("non UTF-8 path"))?;
    let image = imgcodecs::imread(path_str, IMREAD_GRAYSCALE)?;
    if image.empty() {
        anyhow::bail!("not a readable image");
    }
    Ok(image)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchMethod {
    /// Normalized cross-correlation hit, in preprocessed query coordinates.
    Template { scale: f64, location: Point, size: Size },
    /// Keypoint matches surviving the ratio test.
    Feature { good_matches: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BankMatch {
    /// Template directory name.
    pub group: String,
    pub identity: BankIdentity,
    /// Correlation for template hits, good-match count for feature hits.
    pub score: f64,
    pub method: MatchMethod,
}

#[derive(Debug, Clone, Copy)]
struct TemplateHit {
    scale: f64,
    score: f64,
    location: Point,
    size: Size,
}

pub struct BankIdentifier {
    config: IdentifierConfig,
    sift: Ptr<SIFT>,
    matcher: FlannBasedMatcher,
}

impl BankIdentifier {
    pub fn new(config: IdentifierConfig) -> opencv::Result<Self> {
        Ok(Self {
            config,
            sift: SIFT::create_def()?,
            matcher: FlannBasedMatcher::new_def()?,
        })
    }

    pub fn config(&self) -> &IdentifierConfig {
        &self.config
    }

    /// Search `library` for the logo on `query`.
    ///
    /// Groups and templates are visited in library order. A correlation above
    /// the accept threshold wins at once. Otherwise the feature match count is
    /// compared against the best seen so far, and a count above the good-match
    /// threshold also ends the search. Returns `None` when nothing scored.
    pub fn identify(
        &mut self,
        query: &Mat,
        library: &TemplateLibrary,
    ) -> opencv::Result<Option<BankMatch>> {
        if library.is_empty() {
            return Ok(None);
        }

        let query_gray = preprocess::to_grayscale(query)?;
        let query_prepared = self.prepare_query(&query_gray)?;
        let mut query_descriptors: Option<Mat> = None;
        let mut best: Option<BankMatch> = None;

        'groups: for group in library.groups() {
            for template in &group.templates {
                let template_prepared = self.prepare_template(&template.image)?;
                let hit = self.match_multi_scale(&query_prepared, &template_prepared)?;

                if let Some(hit) = hit {
                    debug!(
                        "{} [{}]: best scale {:.1}, best correlation {:.4}",
                        group.name,
                        template.path.display(),
                        hit.scale,
                        hit.score
                    );
                    if hit.score > self.config.correlation_accept {
                        best = Some(BankMatch {
                            group: group.name.clone(),
                            identity: group.identity,
                            score: hit.score,
                            method: MatchMethod::Template {
                                scale: hit.scale,
                                location: hit.location,
                                size: hit.size,
                            },
                        });
                        break 'groups;
                    }
                }

                let image_desc = match query_descriptors.take() {
                    Some(desc) => desc,
                    None => self.describe(&query_gray)?,
                };
                let good = self.count_good_matches(&image_desc, &template.image)?;
                query_descriptors = Some(image_desc);
                debug!("{} [{}]: {} good feature matches", group.name, template.path.display(), good);

                let best_score = best.as_ref().map_or(0.0, |b| b.score);
                if good as f64 > best_score {
                    best = Some(BankMatch {
                        group: group.name.clone(),
                        identity: group.identity,
                        score: good as f64,
                        method: MatchMethod::Feature { good_matches: good },
                    });
                }

                if best
                    .as_ref()
                    .is_some_and(|b| b.score > self.config.good_match_accept as f64)
                {
                    break 'groups;
                }
            }
        }

        match &best {
            Some(found) => info!(
                "Identified bank group '{}' ({}) via {:?}",
                found.group, found.identity, found.method
            ),
            None => info!("No bank template matched"),
        }
        Ok(best)
    }

    /// Width-normalise, crop the footer, blur and binarize an e-slip.
    pub fn prepare_query(&self, gray: &Mat) -> opencv::Result<Mat> {
        let resized = preprocess::resize_to_width(gray, self.config.query_width)?;
        let cropped = preprocess::crop_top_fraction(&resized, self.config.crop_fraction)?;
        let blurred = preprocess::gaussian_blur(&cropped, self.config.blur_kernel)?;
        preprocess::otsu_binarize(&blurred)
    }

    fn prepare_template(&self, gray: &Mat) -> opencv::Result<Mat> {
        let resized = match self.config.template_width {
            Some(width) => preprocess::resize_to_width(gray, width)?,
            None => gray.try_clone()?,
        };
        let blurred = preprocess::gaussian_blur(&resized, self.config.blur_kernel)?;
        preprocess::otsu_binarize(&blurred)
    }

    fn match_multi_scale(&self, image: &Mat, template: &Mat) -> opencv::Result<Option<TemplateHit>> {
        let mut best: Option<TemplateHit> = None;

        for &scale in &self.config.scales {
            let width = (template.cols() as f64 * scale) as i32;
            let height = (template.rows() as f64 * scale) as i32;
            if width < 1 || height < 1 || width > image.cols() || height > image.rows() {
                continue;
            }

            let mut resized = Mat::default();
            imgproc::resize_def(template, &mut resized, Size::new(width, height))?;

            let mut result = Mat::default();
            imgproc::match_template(
                image,
                &resized,
                &mut result,
                imgproc::TM_CCOEFF_NORMED,
                &Mat::default(),
            )?;

            let mut _min_val = 0.0;
            let mut max_val = 0.0;
            let mut _min_loc = Point::default();
            let mut max_loc = Point::default();

            core::min_max_loc(
                &result,
                Some(&mut _min_val),
                Some(&mut max_val),
                Some(&mut _min_loc),
                Some(&mut max_loc),
                &Mat::default(),
            )?;

            if best.is_none_or(|b| max_val > b.score) {
                best = Some(TemplateHit {
                    scale,
                    score: max_val,
                    location: max_loc,
                    size: Size::new(width, height),
                });
            }
        }

        Ok(best)
    }

    /// SIFT descriptors matched template-to-image with k=2, filtered by Lowe's ratio.
    /// `image_desc` is computed once per query.
    fn count_good_matches(&mut self, image_desc: &Mat, template: &Mat) -> opencv::Result<usize> {
        let template_desc = self.describe(template)?;
        if image_desc.rows() < 2 || template_desc.rows() < 1 {
            return Ok(0);
        }

        let mut matches: Vector<Vector<DMatch>> = Vector::new();
        self.matcher
            .knn_train_match_def(&template_desc, image_desc, &mut matches, 2)?;

        let ratio = self.config.lowe_ratio;
        let good = matches
            .iter()
            .filter(|pair| {
                pair.len() == 2
                    && match (pair.get(0), pair.get(1)) {
                        (Ok(m), Ok(n)) => m.distance < ratio * n.distance,
                        _ => false,
                    }
            })
            .count();
        Ok(good)
    }

    fn describe(&mut self, gray: &Mat) -> opencv::Result<Mat> {
        let mut keypoints: Vector<KeyPoint> = Vector::new();
        let mut descriptors = Mat::default();
        self.sift
            .detect_and_compute_def(gray, &Mat::default(), &mut keypoints, &mut descriptors)?;
        Ok(descriptors)
    }
}
