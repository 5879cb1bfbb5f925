use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pdf_reports::{is_pdf, DocRaptorOptions, GenerationRequest, PdfClient, StorageTarget};

#[derive(Parser)]
#[command(name = "pdf-reports")]
#[command(version)]
#[command(about = "Generate PDFs with a remote rendering service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Source {
    /// Inline HTML to render
    #[arg(long)]
    html: Option<String>,

    /// URL of the page to render (wins over --html)
    #[arg(long)]
    url: Option<String>,

    /// Ask for a watermarked test render
    #[arg(long)]
    test: bool,

    /// Service region (us, eu, ap)
    #[arg(long)]
    region: Option<String>,

    /// API token, overrides JOURNEY_PDF_KEY / DOCRAPTOR_TOKEN
    #[arg(long)]
    token: Option<String>,
}

impl Source {
    fn into_request(self, docraptor: bool) -> Result<GenerationRequest> {
        if self.html.is_none() && self.url.is_none() {
            bail!("either --html or --url is required");
        }

        let mut request = GenerationRequest {
            html: self.html,
            url: self.url,
            test: self.test,
            token: self.token,
            region: self.region,
            ..Default::default()
        };
        if docraptor {
            request = request.with_docraptor(DocRaptorOptions::new());
        }
        Ok(request)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render a PDF and save it locally
    Generate {
        #[command(flatten)]
        source: Source,

        /// Use DocRaptor instead of the PDF service
        #[arg(long)]
        docraptor: bool,

        /// Output file (prints base64 to stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Render a PDF straight into S3 and print a signed URL
    Upload {
        #[command(flatten)]
        source: Source,

        #[arg(long, env = "JOURNEY_PDF_BUCKET")]
        bucket: String,

        /// Key prefix, used verbatim
        #[arg(long)]
        prefix: Option<String>,

        /// File name including extension
        #[arg(long)]
        name: String,

        /// Signed URL lifetime in seconds (defaults to 7 days)
        #[arg(long)]
        expires: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = PdfClient::from_env()?;

    match cli.command {
        Commands::Generate {
            source,
            docraptor,
            output,
        } => {
            let request = source.into_request(docraptor)?;
            let pdf = client.generate(&request).await?;
            let bytes = pdf.materialize().await?;

            if !is_pdf(&bytes) {
                tracing::warn!("Backend returned a document without a PDF header");
            }

            match output {
                Some(path) => {
                    tokio::fs::write(&path, &bytes).await?;
                    tracing::info!("Wrote {} bytes to {}", bytes.len(), path.display());
                }
                None => println!("{}", pdf.to_base64().await?),
            }
        }
        Commands::Upload {
            source,
            bucket,
            prefix,
            name,
            expires,
        } => {
            let request = source.into_request(false)?;
            // Credentials come from the ambient AWS chain
            let mut target = StorageTarget::new(bucket, name);
            target.prefix = prefix;

            let pdf = client.generate_and_upload(&request, &target).await?;
            let url = pdf.signed_url(expires.map(Duration::from_secs)).await?;
            println!("{}", url);
        }
    }

    Ok(())
}
