//! Masterload CLI - validate and submit master-data batches
//!
//! # Commands
//!
//! ```bash
//! masterload validate partners partners.json       # Offline validation
//! masterload submit partners partners.json         # Validate + upsert
//! masterload upload invoice.pdf --category <uuid>  # Document upload
//! ```
//!
//! The API key is taken from `--api-key` or the `MASTERLOAD_API_KEY`
//! environment variable (dotenv-aware).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use masterload::{
    normalize_batch, validate_batch, ApiError, BankAccount, Client, GlAccount,
    GlAccountImportOptions, ImportOptions, ImportState, Invoice, ObjectTenantOwner, Partner,
    PartnerImportOptions, RealEstateObject, UploadFile, ValidationError,
};

#[derive(Parser)]
#[command(name = "masterload")]
#[command(about = "Validate and bulk-upsert business master-data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    BankAccounts,
    GlAccounts,
    Partners,
    RealEstateObjects,
    TenantOwners,
    Invoices,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON batch file offline, printing every error
    Validate {
        /// Entity kind of the records in the file
        kind: Kind,

        /// Input JSON file (array of records)
        input: PathBuf,

        /// Reset invalid optional fields instead of failing on them
        #[arg(long)]
        clean: bool,
    },

    /// Validate a JSON batch file and upsert it
    Submit {
        /// Entity kind of the records in the file
        kind: Kind,

        /// Input JSON file (array of records)
        input: PathBuf,

        /// Fail server-side if any record is invalid
        #[arg(long)]
        fail_on_invalid: bool,

        /// Import either all records or none in case of any error
        #[arg(long)]
        all_or_none: bool,

        /// Let the server import cleaned-up versions of invalid partners
        #[arg(long)]
        use_cleaned_invalid: bool,

        /// Find existing GL accounts by name if not found by number
        #[arg(long)]
        find_by_name: bool,

        /// Append object numbers to GL account numbers
        #[arg(long)]
        object_specific_account_nos: bool,

        /// Name or ID of who did the import
        #[arg(short, long)]
        source: Option<String>,

        /// API key (default: MASTERLOAD_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Override the API base URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Upload a document, optionally with invoice metadata
    Upload {
        /// Document file to upload
        file: PathBuf,

        /// Document category UUID
        #[arg(short, long)]
        category: Uuid,

        /// Tags for the document (repeatable)
        #[arg(short, long)]
        tag: Vec<String>,

        /// Invoice metadata JSON file, validated and attached
        #[arg(short, long)]
        invoice: Option<PathBuf>,

        /// API key (default: MASTERLOAD_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Override the API base URL
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Validate { kind, input, clean } => validate_file(kind, &input, clean),
        Commands::Submit {
            kind,
            input,
            fail_on_invalid,
            all_or_none,
            use_cleaned_invalid,
            find_by_name,
            object_specific_account_nos,
            source,
            api_key,
            base_url,
        } => {
            let client = make_client(api_key, base_url)?;
            let options = ImportOptions {
                fail_on_invalid,
                all_or_none,
                source,
            };
            let states: Vec<(ImportState, String)> = match kind {
                Kind::BankAccounts => {
                    let mut records: Vec<BankAccount> = load_records(&input)?;
                    let results = client.post_bank_accounts(&mut records, &options).await?;
                    results.iter().map(|r| (r.state, r.error.clone())).collect()
                }
                Kind::GlAccounts => {
                    let records: Vec<GlAccount> = load_records(&input)?;
                    let options = GlAccountImportOptions {
                        find_by_name,
                        object_specific_account_nos,
                        base: options,
                    };
                    let results = client.post_gl_accounts(&records, &options).await?;
                    results.iter().map(|r| (r.state, r.error.clone())).collect()
                }
                Kind::Partners => {
                    let mut records: Vec<Partner> = load_records(&input)?;
                    let options = PartnerImportOptions {
                        use_cleaned_invalid,
                        base: options,
                    };
                    let results = client.post_partners(&mut records, &options).await?;
                    results.iter().map(|r| (r.state, r.error.clone())).collect()
                }
                Kind::RealEstateObjects => {
                    let mut records: Vec<RealEstateObject> = load_records(&input)?;
                    let results = client
                        .post_real_estate_objects(&mut records, options.source.as_deref())
                        .await?;
                    results.iter().map(|r| (r.state, r.error.clone())).collect()
                }
                Kind::TenantOwners => {
                    let records: Vec<ObjectTenantOwner> = load_records(&input)?;
                    let results = client
                        .post_object_tenant_owners(&records, options.source.as_deref())
                        .await?;
                    results.iter().map(|r| (r.state, r.error.clone())).collect()
                }
                Kind::Invoices => {
                    return Err("invoices are uploaded with `masterload upload --invoice`".into())
                }
            };
            print_states(&states);
            Ok(())
        }
        Commands::Upload {
            file,
            category,
            tag,
            invoice,
            api_key,
            base_url,
        } => {
            let client = make_client(api_key, base_url)?;
            let document = UploadFile::from_path(&file).await?;
            let document_id = match invoice {
                Some(invoice_path) => {
                    let mut invoice: Invoice =
                        serde_json::from_str(&std::fs::read_to_string(&invoice_path)?)?;
                    client
                        .upload_invoice(category, document, &mut invoice, &tag)
                        .await?
                }
                None => client.upload_document(category, document, None, &tag).await?,
            };
            println!("✓ Uploaded document {document_id}");
            Ok(())
        }
    }
}

fn print_states(states: &[(ImportState, String)]) {
    for (i, (state, error)) in states.iter().enumerate() {
        if state == &ImportState::Error {
            println!("   [{i}] {state}: {error}");
        } else {
            println!("   [{i}] {state}");
        }
    }
    let errors = states
        .iter()
        .filter(|(state, _)| state == &ImportState::Error)
        .count();
    if errors == 0 {
        println!("✓ Imported {} record(s)", states.len());
    } else {
        println!(
            "⚠ Imported {} record(s), {errors} with errors",
            states.len() - errors
        );
    }
}

fn make_client(
    api_key: Option<String>,
    base_url: Option<String>,
) -> Result<Client, ApiError> {
    let mut client = match api_key {
        Some(key) => Client::new(key),
        None => Client::from_env()?,
    };
    if let Some(base_url) = base_url {
        client = client.with_base_url(base_url);
    }
    Ok(client)
}

fn load_records<T: DeserializeOwned>(path: &PathBuf) -> Result<Vec<T>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn validate_file(kind: Kind, input: &PathBuf, clean: bool) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = match kind {
        Kind::BankAccounts => {
            let mut records: Vec<BankAccount> = load_records(input)?;
            normalize_batch("BankAccount", &mut records, clean)
        }
        Kind::GlAccounts => {
            let records: Vec<GlAccount> = load_records(input)?;
            validate_batch("GLAccount", &records)
        }
        Kind::Partners => {
            let mut records: Vec<Partner> = load_records(input)?;
            normalize_batch("Partner", &mut records, clean)
        }
        Kind::RealEstateObjects => {
            let mut records: Vec<RealEstateObject> = load_records(input)?;
            normalize_batch("RealEstateObject", &mut records, clean)
        }
        Kind::TenantOwners => {
            let records: Vec<ObjectTenantOwner> = load_records(input)?;
            validate_batch("ObjectTenantOwner", &records)
        }
        Kind::Invoices => {
            let mut records: Vec<Invoice> = load_records(input)?;
            let mut err = ValidationError::new();
            for (i, invoice) in records.iter_mut().enumerate() {
                if let Err(e) = invoice.validate() {
                    err.push_error(e.prefixed(&format!("Invoice[{i}]")));
                }
            }
            err.into_result()
        }
    };
    match outcome {
        Ok(()) => {
            println!("✓ All records are valid");
            Ok(())
        }
        Err(err) => {
            eprintln!("✗ {} validation error(s):", err.len());
            for e in err.errors() {
                eprintln!("   {e}");
            }
            Err("validation failed".into())
        }
    }
}
