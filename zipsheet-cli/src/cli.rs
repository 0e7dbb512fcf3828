use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::{Text, validator::Validation};
use std::path::{Path, PathBuf};
use zipsheet_core::{
    CellValue, Config, RefreshError, Refresher, Sheet, Workbook, install_on_open_trigger,
    layout::{INTERFACE_SHEET, POSTAL_CODE_CELL},
    open_workbook,
    refresh::RefreshReport,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "zipsheet", version, about = "Fill a forecast workbook from a US postal code")]
pub struct Cli {
    /// Workbook file; defaults to the configured path.
    #[arg(long, global = true)]
    pub workbook: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new workbook with the interface, hourly and daily sheets.
    Init {
        /// Postal code to place in the input cell.
        #[arg(long)]
        zip: Option<String>,

        /// Overwrite an existing workbook.
        #[arg(long)]
        force: bool,
    },

    /// Set the postal code in the input cell.
    SetZip {
        /// 5-digit US postal code; prompts when omitted.
        zip: Option<String>,
    },

    /// Fetch the forecast and rewrite the workbook now.
    Refresh,

    /// Register a refresh that runs every time the workbook is opened.
    InstallTrigger,

    /// Open the workbook, running any on-open triggers.
    Open,

    /// Print a sheet.
    Show {
        /// Sheet name.
        #[arg(default_value = INTERFACE_SHEET)]
        sheet: String,

        /// Maximum number of rows to print.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Configure service endpoints and the default workbook.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;
        let path = match self.workbook {
            Some(path) => path,
            None => config.workbook_path()?,
        };

        match self.command {
            Command::Init { zip, force } => {
                if path.exists() && !force {
                    bail!(
                        "Workbook already exists: {}\nHint: pass --force to replace it.",
                        path.display()
                    );
                }
                let mut workbook = Workbook::template();
                if let Some(zip) = zip {
                    set_postal_code(&mut workbook, zip)?;
                }
                workbook.save(&path)?;
                println!("Created workbook {}", path.display());
            }
            Command::SetZip { zip } => {
                let mut workbook = Workbook::load(&path)?;
                let zip = match zip {
                    Some(zip) => zip,
                    None => prompt_postal_code()?,
                };
                set_postal_code(&mut workbook, zip)?;
                workbook.save(&path)?;
            }
            Command::Refresh => {
                let mut workbook = Workbook::load(&path)?;
                let result = Refresher::from_config(&config).refresh(&mut workbook).await;
                print_report(&save_after_refresh(&workbook, &path, result)?);
            }
            Command::InstallTrigger => {
                let mut workbook = Workbook::load(&path)?;
                install_on_open_trigger(&mut workbook);
                workbook.save(&path)?;
                println!(
                    "On-open refresh installed ({} trigger(s) registered)",
                    workbook.triggers().len()
                );
            }
            Command::Open => {
                let mut workbook = Workbook::load(&path)?;
                let refresher = Refresher::from_config(&config);
                let result = open_workbook(&mut workbook, &refresher).await;
                for report in save_after_refresh(&workbook, &path, result)? {
                    print_report(&report);
                }
                print!("{}", render::sheet(workbook.sheet(INTERFACE_SHEET)?, None));
            }
            Command::Show { sheet, limit } => {
                let workbook = Workbook::load(&path)?;
                print!("{}", render::sheet(workbook.sheet(&sheet)?, limit));
            }
            Command::Configure => configure(config)?,
        }

        Ok(())
    }
}

/// Save the workbook whether or not the refresh succeeded; whatever was
/// written before a failure is kept.
fn save_after_refresh<T>(
    workbook: &Workbook,
    path: &Path,
    result: Result<T, RefreshError>,
) -> Result<T> {
    workbook.save(path)?;
    result.map_err(|err| {
        tracing::warn!(
            error = %err,
            path = %path.display(),
            "refresh failed; saved partial workbook"
        );
        err.into()
    })
}

fn set_postal_code(workbook: &mut Workbook, zip: String) -> Result<()> {
    let interface = workbook.sheet_mut(INTERFACE_SHEET)?;
    interface.set_value(POSTAL_CODE_CELL, CellValue::Text(zip.trim().to_string()));
    // Validate the same way a refresh will read it.
    zipsheet_core::refresh::read_postal_code(&*interface)?;
    Ok(())
}

fn prompt_postal_code() -> Result<String> {
    Text::new("Postal code:")
        .with_validator(|input: &str| {
            let trimmed = input.trim();
            if trimmed.len() == 5 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid("Enter a 5-digit US postal code".into()))
            }
        })
        .prompt()
        .context("Failed to read postal code")
}

fn configure(mut config: Config) -> Result<()> {
    let geocoding = Text::new("Postal code lookup URL:")
        .with_default(config.geocoding_base_url())
        .prompt()
        .context("Failed to read geocoding URL")?;
    let forecast = Text::new("Forecast URL:")
        .with_default(config.forecast_base_url())
        .prompt()
        .context("Failed to read forecast URL")?;
    let workbook_default = config.workbook_path()?.display().to_string();
    let workbook = Text::new("Default workbook:")
        .with_default(&workbook_default)
        .prompt()
        .context("Failed to read workbook path")?;

    config.geocoding_base_url = Some(geocoding);
    config.forecast_base_url = Some(forecast);
    config.workbook_path = Some(PathBuf::from(workbook));
    config.save()?;

    println!("Saved {}", Config::config_file_path()?.display());
    Ok(())
}

fn print_report(report: &RefreshReport) {
    println!(
        "Weather for {}: {} hourly row(s) ({} past row(s) removed), {} daily row(s)",
        report.place,
        report.hourly_rows.saturating_sub(report.pruned_rows),
        report.pruned_rows,
        report.daily_rows
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use zipsheet_core::{InputError, layout::BANNER_CELL};

    #[test]
    fn failed_refresh_still_saves_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.json");
        let mut workbook = Workbook::template();
        workbook
            .sheet_mut(INTERFACE_SHEET)
            .unwrap()
            .set_value(BANNER_CELL, "Weather for New York, NY".into());

        let result: Result<RefreshReport, RefreshError> =
            Err(InputError::Empty { cell: "D2".into() }.into());
        let err = save_after_refresh(&workbook, &path, result).unwrap_err();

        assert!(err.to_string().contains("D2"));
        assert_eq!(Workbook::load(&path).unwrap(), workbook);
    }

    #[test]
    fn successful_refresh_passes_reports_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.json");
        let workbook = Workbook::template();

        let result: Result<Vec<RefreshReport>, RefreshError> = Ok(Vec::new());
        let reports = save_after_refresh(&workbook, &path, result).unwrap();

        assert!(reports.is_empty());
        assert!(path.exists());
    }
}
