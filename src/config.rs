use clap::Parser;
use std::path::PathBuf;

/// Settings for the review web server.
#[derive(Parser, Debug, Clone)]
#[command(name = "website", about = "Review and correct extracted bank-statement spreadsheets")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "SHEETFIX_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, short, env = "SHEETFIX_PORT", default_value_t = 3000)]
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Settings for the terminal reviewer.
#[derive(Parser, Debug, Clone)]
#[command(name = "cli", about = "Review a spreadsheet in the terminal")]
pub struct CliConfig {
    /// Spreadsheet to open (xlsx, xls, xlsb or ods)
    pub file: PathBuf,

    /// Where exported copies are written; defaults to the file's directory
    #[arg(long, short)]
    pub output_dir: Option<PathBuf>,
}

impl CliConfig {
    pub fn export_dir(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => self
                .file
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}
