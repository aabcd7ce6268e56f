//! Run orchestration across data sources.
//!
//! Sources are processed in configuration order. The partition number `num`
//! starts at 1 and keeps counting across sources, so it can make output names
//! unique for the whole run.

use std::path::Path;

use sql2xlsx_data::{open_source, QuerySource, TemplateSource};
use tracing::info;

use crate::config::{Config, SourceSettings};
use crate::error::{Error, Result};
use crate::partition::PartitionSpec;
use crate::report::{PartitionReport, ReportWriter};

/// Write every partition of one source
///
/// # Returns
/// The next partition number and the reports written, in partition order
pub fn process_source<T, Q>(
    writer: &ReportWriter<'_, T>,
    source: &mut Q,
    spec: &PartitionSpec,
    first_num: usize,
) -> Result<(usize, Vec<PartitionReport>)>
where
    T: TemplateSource,
    Q: QuerySource + ?Sized,
{
    let partitions = spec.partitions()?;
    let mut reports = Vec::with_capacity(partitions.len());
    let mut num = first_num;

    for partition in &partitions {
        reports.push(writer.write_partition(source, partition, num)?);
        num += 1;
    }

    Ok((num, reports))
}

/// Run every configured source
///
/// `open` connects to the database of a source. The partition spec of a source
/// is parsed before its database is opened; the first error stops the run.
pub fn run<T, Q, F>(
    config: &Config,
    template: &T,
    output_dir: &Path,
    mut open: F,
) -> Result<Vec<PartitionReport>>
where
    T: TemplateSource,
    Q: QuerySource,
    F: FnMut(&SourceSettings) -> Result<Q>,
{
    let writer = ReportWriter::from_config(template, config).with_output_dir(output_dir);
    let mut reports = Vec::new();
    let mut num = 1;

    for settings in &config.input.sources {
        let spec = settings.partition.to_spec()?;
        info!(
            "Source {}: {} partitions from {} to {}",
            settings.name,
            spec.granularity(),
            spec.begin(),
            spec.end()
        );

        let mut source = open(settings)?;
        let (next, written) = process_source(&writer, &mut source, &spec, num)?;
        num = next;
        reports.extend(written);
    }

    Ok(reports)
}

/// Run every configured source against its database
pub fn run_with_databases<T: TemplateSource>(
    config: &Config,
    template: &T,
    output_dir: &Path,
) -> Result<Vec<PartitionReport>> {
    let driver = config.input.driver.clone();
    run(config, template, output_dir, |settings| {
        open_source(&driver, &settings.name).map_err(Error::Query)
    })
}
