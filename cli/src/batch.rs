use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use rayon::prelude::*;

use imgconv_core::config::ConvertConfig;
use imgconv_core::convert::{convert_file, Conversion};
use imgconv_core::output::{
    create_output, reserve_output_path, resolve_output_path, OutputFile,
};
use imgconv_core::{resolve_decoder, resolve_encoder, ConvertError, Decoder, Encoder};

use crate::error::BatchError;
use crate::io::{collect_files, output_base};
use crate::report::{FileResult, Report};

/// One conversion run over a directory tree.
///
/// The decoder and encoder are resolved once, up front, so an unsupported
/// extension fails before any file is touched.
pub struct Batch {
    root: PathBuf,
    config: ConvertConfig,
    decoder: Box<dyn Decoder>,
    encoder: Box<dyn Encoder>,
}

impl Batch {
    pub fn new(root: impl Into<PathBuf>, config: ConvertConfig) -> Result<Self, ConvertError> {
        let decoder = resolve_decoder(&config.input_ext)?;
        let encoder = resolve_encoder(&config.output_ext, config.quality)?;

        log::debug!(
            "Decoder: {}, encoder: {} (quality {:?})",
            decoder.format().as_str(),
            encoder.format().as_str(),
            encoder.quality()
        );

        Ok(Self {
            root: root.into(),
            config,
            decoder,
            encoder,
        })
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Files to convert. Collected before any conversion starts, so outputs
    /// written during the run are never picked up as inputs.
    pub fn collect(&self) -> Result<Vec<PathBuf>, BatchError> {
        collect_files(&self.root, &self.config.input_ext)
    }

    fn base_for(&self, input: &Path) -> PathBuf {
        output_base(input, &self.root, self.config.output_dir.as_deref())
    }

    /// Planned `input -> output` pairs, without writing anything.
    ///
    /// Each output is resolved against the filesystem as it is now, so two
    /// inputs that share a base name show the same planned output.
    pub fn plan(&self, files: &[PathBuf]) -> Result<Vec<(PathBuf, PathBuf)>, BatchError> {
        let suffix = self.config.output_suffix();
        files
            .iter()
            .map(|input| {
                resolve_output_path(&self.base_for(input), &suffix)
                    .map(|output| (input.clone(), output))
                    .map_err(|source| BatchError::File {
                        path: input.clone(),
                        source,
                    })
            })
            .collect()
    }

    /// Convert a single input file to a fresh output path.
    pub fn convert_one(&self, input: &Path) -> Result<Conversion, ConvertError> {
        let base = self.base_for(input);
        let suffix = self.config.output_suffix();

        if self.config.output_dir.is_some() {
            if let Some(parent) = base.parent() {
                fs::create_dir_all(parent).map_err(|e| ConvertError::WriteFile {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let parallel = self.config.parallel;
        let open_output = || -> Result<OutputFile, ConvertError> {
            let target = if parallel {
                reserve_output_path(&base, &suffix)?
            } else {
                create_output(resolve_output_path(&base, &suffix)?)?
            };
            log::info!("{} ---> {}", input.display(), target.path.display());
            Ok(target)
        };

        convert_file(input, open_output, &*self.decoder, &*self.encoder)
    }

    /// Convert all `files`, calling `on_file` after each one.
    ///
    /// A failed file is recorded in the report and the run goes on, unless
    /// `fail_fast` is set, in which case the first failure is returned.
    pub fn run(
        &self,
        files: &[PathBuf],
        on_file: &(dyn Fn(&FileResult) + Sync),
    ) -> Result<Report, BatchError> {
        let report = Mutex::new(Report::new());

        let step = |input: &PathBuf| -> Result<(), BatchError> {
            let result = match self.convert_one(input) {
                Ok(conversion) => FileResult::converted(conversion),
                Err(e) => {
                    log::error!("Error converting {}: {}", input.display(), e);
                    if self.config.fail_fast {
                        return Err(BatchError::File {
                            path: input.clone(),
                            source: e,
                        });
                    }
                    FileResult::failed(input.clone(), &e)
                }
            };

            on_file(&result);
            report
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .add(result);
            Ok(())
        };

        if self.config.parallel {
            files.par_iter().try_for_each(step)?;
        } else {
            files.iter().try_for_each(step)?;
        }

        let mut report = report.into_inner().unwrap_or_else(PoisonError::into_inner);
        report.results.sort_by(|a, b| a.input.cmp(&b.input));
        Ok(report)
    }
}
