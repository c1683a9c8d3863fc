use clap::{Parser, Subcommand};
use pvault_core::config::required_fields_from_env_value;
use pvault_core::{
    CoreConfig, EmailAddress, FileStore, HashedPassword, MobileNumber, NewUser, NonEmptyText,
    PatientStore, TokenDigest, UserId, UserStore, DEFAULT_PATIENT_DATA_DIR,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pvault")]
#[command(about = "Patient Vault administration CLI")]
struct Cli {
    /// Directory holding the patient and user documents
    #[arg(long, global = true, env = "PVAULT_DATA_DIR", default_value = DEFAULT_PATIENT_DATA_DIR)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a user with an already-hashed password and an issued bearer token
    AddUser {
        email: String,
        name: String,
        national_id: String,
        mobile_number: String,
        /// Password hash produced by the identity service
        #[arg(long)]
        hashed_password: String,
        /// Bearer token to accept for this user; only its digest is stored
        #[arg(long)]
        token: Option<String>,
    },
    /// Show a single user
    ShowUser {
        /// User id
        user_id: String,
    },
    /// List all users
    ListUsers,
    /// List the patients owned by a user
    ListPatients {
        /// Owner's user id
        #[arg(long)]
        owner: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'pvault --help' for commands");
        return Ok(());
    };

    if !cli.data_dir.exists() {
        return Err(format!(
            "Patient data directory does not exist: {}",
            cli.data_dir.display()
        )
        .into());
    }
    let required =
        required_fields_from_env_value(std::env::var("PVAULT_REQUIRED_PATIENT_FIELDS").ok());
    let cfg = CoreConfig::new(cli.data_dir, required)?;
    let store = FileStore::open(&cfg).await?;

    match command {
        Commands::AddUser {
            email,
            name,
            national_id,
            mobile_number,
            hashed_password,
            token,
        } => {
            let user = store
                .insert_user(NewUser {
                    email: EmailAddress::parse(&email)?,
                    name: NonEmptyText::new(&name)?,
                    national_id: NonEmptyText::new(&national_id)?,
                    mobile_number: MobileNumber::parse(&mobile_number)?,
                    hashed_password: HashedPassword::new(hashed_password),
                    token_digest: token.as_deref().map(TokenDigest::of),
                })
                .await?;
            println!("Added user with ID: {}", user.id);
        }
        Commands::ShowUser { user_id } => {
            let id = UserId::parse(&user_id)?;
            match store.find_user(id).await? {
                Some(user) => println!("{}", serde_json::to_string_pretty(&user)?),
                None => eprintln!("No user with ID: {}", id),
            }
        }
        Commands::ListUsers => {
            let users = store.list_users().await?;
            if users.is_empty() {
                println!("No users found.");
            } else {
                for user in users {
                    println!(
                        "ID: {}, Name: {}, Email: {}, Created: {}",
                        user.id, user.name, user.email, user.created_at
                    );
                }
            }
        }
        Commands::ListPatients { owner } => {
            let owner = UserId::parse(&owner)?;
            let patients = store.find_patients_by_owner(owner).await?;
            if patients.is_empty() {
                println!("No patients found.");
            } else {
                for patient in patients {
                    println!("{}", serde_json::to_string(&patient)?);
                }
            }
        }
    }

    Ok(())
}
