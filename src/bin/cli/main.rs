use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::time::Duration;

use object_store_manager::{
    app::{AppBuilder, StorageBackend},
    domain::{
        models::{ObjectVersionRef, VersioningState},
        value_objects::{BucketName, ObjectKey, VersionId},
    },
    ports::services::{BucketMaintenanceService, DrainOptions, PolicyService},
    ports::storage::VersionStoreClient,
    services::VersionLister,
};

#[derive(Parser, Debug)]
#[command(name = "object-manager-cli")]
#[command(about = "CLI for managing versioned buckets on an S3-compatible store", long_about = None)]
struct Cli {
    /// Storage backend type
    #[arg(long, env = "STORAGE_BACKEND", default_value = "s3")]
    backend: String,

    /// S3 endpoint (host or host:port)
    #[arg(long, env = "S3_ENDPOINT", default_value = "localhost:9000")]
    endpoint: String,

    /// S3 region
    #[arg(long, env = "S3_REGION")]
    region: Option<String>,

    /// S3 access key
    #[arg(long, env = "S3_ACCESS_KEY")]
    access_key: Option<String>,

    /// S3 secret key
    #[arg(long, env = "S3_SECRET_KEY")]
    secret_key: Option<String>,

    /// Use SSL for the connection
    #[arg(long, env = "S3_USE_SSL", default_value = "false")]
    use_ssl: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Delete every object version and delete marker in a bucket
    Empty {
        /// Bucket name
        bucket: String,
        /// Bypass governance retention and clear legal holds
        #[arg(long)]
        force: bool,
        /// Abort after this many seconds, keeping completed deletions
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Listing page size
        #[arg(long, default_value = "1000")]
        page_size: u32,
    },

    /// Delete an object: one version when --version-id is given, otherwise
    /// all versions of the key
    Delete {
        /// Bucket name
        bucket: String,
        /// Object key
        key: String,
        /// Specific version to delete
        #[arg(long)]
        version_id: Option<String>,
        /// Bypass governance retention and clear legal holds
        #[arg(long)]
        force: bool,
    },

    /// List object versions and delete markers
    Versions {
        /// Bucket name
        bucket: String,
        /// Prefix to filter keys
        #[arg(short, long)]
        prefix: Option<String>,
    },

    /// Manage the bucket policy
    Policy {
        #[command(subcommand)]
        command: PolicyCommands,
    },

    /// Manage bucket versioning
    Versioning {
        #[command(subcommand)]
        command: VersioningCommands,
    },
}

#[derive(Subcommand, Debug)]
enum PolicyCommands {
    /// Print the bucket policy
    Get {
        /// Bucket name
        bucket: String,
    },

    /// Write a policy document and wait for reads to converge
    Set {
        /// Bucket name
        bucket: String,
        /// Path to the policy JSON file
        file: String,
    },

    /// Delete the policy and wait for reads to converge
    Delete {
        /// Bucket name
        bucket: String,
    },
}

#[derive(Subcommand, Debug)]
enum VersioningCommands {
    /// Print the bucket versioning state
    Get {
        /// Bucket name
        bucket: String,
    },

    /// Set the bucket versioning state (enabled | suspended)
    Set {
        /// Bucket name
        bucket: String,
        /// Desired state
        status: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let cli = Cli::parse();

    let backend = match cli.backend.as_str() {
        "memory" => StorageBackend::InMemory,
        _ => StorageBackend::S3 {
            endpoint: cli.endpoint.clone(),
            region: cli.region.clone(),
            access_key: cli.access_key.clone(),
            secret_key: cli.secret_key.clone(),
            session_token: None,
            secure: cli.use_ssl,
        },
    };

    let app = AppBuilder::new()
        .with_storage_backend(backend)
        .build()
        .context("Failed to initialize application")?;

    match cli.command {
        Commands::Empty {
            bucket,
            force,
            timeout_secs,
            page_size,
        } => {
            let bucket = parse_bucket(&bucket)?;
            let mut options = DrainOptions {
                force,
                ..DrainOptions::default()
            }
            .with_page_size(page_size);
            if let Some(secs) = timeout_secs {
                options = options
                    .with_deadline(tokio::time::Instant::now() + Duration::from_secs(secs));
            }

            match app.maintenance.empty_bucket(&bucket, &options).await {
                Ok(report) => print_report(&report),
                Err(aborted) => {
                    print_report(&aborted.partial);
                    return Err(anyhow::Error::new(aborted.source).context("Drain aborted"));
                }
            }
        }

        Commands::Delete {
            bucket,
            key,
            version_id,
            force,
        } => {
            let bucket = parse_bucket(&bucket)?;
            let key = ObjectKey::new(key).context("Invalid object key")?;

            match version_id {
                Some(version_id) => {
                    let version_id =
                        VersionId::new(version_id).context("Invalid version id")?;
                    let target = ObjectVersionRef::new(key, version_id);
                    app.maintenance
                        .delete_version(&bucket, &target, force)
                        .await?;
                    println!("Deleted {}", target);
                }
                None => {
                    let options = DrainOptions {
                        force,
                        ..DrainOptions::default()
                    };
                    match app
                        .maintenance
                        .delete_all_versions(&bucket, &key, &options)
                        .await
                    {
                        Ok(report) => print_report(&report),
                        Err(aborted) => {
                            print_report(&aborted.partial);
                            return Err(
                                anyhow::Error::new(aborted.source).context("Drain aborted")
                            );
                        }
                    }
                }
            }
        }

        Commands::Versions { bucket, prefix } => {
            let bucket = parse_bucket(&bucket)?;
            let mut lister = VersionLister::new(
                app.store.clone(),
                bucket,
                prefix,
                VersionLister::DEFAULT_PAGE_SIZE,
            );

            while lister.has_more_pages() {
                let page = lister.next_page().await?;
                for entry in &page.versions {
                    println!(
                        "version        {} {} ({} bytes)",
                        entry.target.key,
                        entry.target.version_id,
                        entry.size.unwrap_or(0)
                    );
                }
                for entry in &page.delete_markers {
                    println!(
                        "delete-marker  {} {}",
                        entry.target.key, entry.target.version_id
                    );
                }
            }
        }

        Commands::Policy { command } => match command {
            PolicyCommands::Get { bucket } => {
                let bucket = parse_bucket(&bucket)?;
                match app.policy.get_policy(&bucket).await? {
                    Some(document) => println!("{}", document),
                    None => println!("No policy set for bucket '{}'", bucket),
                }
            }
            PolicyCommands::Set { bucket, file } => {
                let bucket = parse_bucket(&bucket)?;
                let document = std::fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read policy file: {}", file))?;
                app.policy.put_policy(&bucket, &document).await?;
                println!("Policy applied to bucket '{}'", bucket);
            }
            PolicyCommands::Delete { bucket } => {
                let bucket = parse_bucket(&bucket)?;
                app.policy.delete_policy(&bucket).await?;
                println!("Policy removed from bucket '{}'", bucket);
            }
        },

        Commands::Versioning { command } => match command {
            VersioningCommands::Get { bucket } => {
                let bucket = parse_bucket(&bucket)?;
                let state = app.store.get_bucket_versioning(&bucket).await?;
                println!("{:?}", state);
            }
            VersioningCommands::Set { bucket, status } => {
                let bucket = parse_bucket(&bucket)?;
                let state = match status.to_ascii_lowercase().as_str() {
                    "enabled" => VersioningState::Enabled,
                    "suspended" => VersioningState::Suspended,
                    other => anyhow::bail!("Unknown versioning state: {}", other),
                };
                app.store.put_bucket_versioning(&bucket, state).await?;
                println!("Versioning {} on bucket '{}'", status, bucket);
            }
        },
    }

    Ok(())
}

fn parse_bucket(name: &str) -> Result<BucketName> {
    BucketName::new(name.to_string()).context("Invalid bucket name")
}

fn print_report(report: &object_store_manager::domain::models::DrainReport) {
    println!("Deleted {} entries", report.deleted);
    if !report.errors.is_empty() {
        println!("{} entries could not be deleted:", report.errors.len());
        for error in &report.errors {
            println!("  {}", error);
        }
    }
}
