//! Command handlers
//!
//! Every handler gets the client and the explicit session; nothing reads
//! ambient state. Admin commands that change data end by printing the
//! table: `add` shows its confirmed local copy, the rest reload it.

use std::path::Path;

use anyhow::{Context, bail};
use insiders_client::{
    CustomerDraft, CustomerId, CustomerTable, CustomerUpdate, InsidersClient, RowSource,
    SessionContext, UploadStatus,
};
use insiders_tabular::{ExportFormat, ExportTable};
use shared::client::SignupRequest;
use tracing::{info, warn};

use crate::cli::{Command, EditArgs, SignupArgs};
use crate::form;
use crate::output::{render_profile, render_record, render_table};

pub async fn run(
    command: Command,
    client: &InsidersClient,
    session: &mut SessionContext,
) -> anyhow::Result<()> {
    match command {
        Command::Signup(args) => signup(client, args).await,
        Command::Login(creds) => {
            let user = client
                .customer_login(&creds.email, &creds.password, session)
                .await?;
            println!("Welcome back, {}!", user.display_name());
            Ok(())
        }
        Command::AdminLogin(creds) => {
            client
                .admin_login(&creds.email, &creds.password, session)
                .await?;
            println!("Signed in as admin {}", creds.email);
            Ok(())
        }
        Command::Logout => {
            client.logout(session)?;
            println!("Signed out");
            Ok(())
        }
        Command::ForgotPassword { email } => {
            let ack = client.forgot_password(&email).await?;
            println!("{}", ack.message.unwrap_or_default());
            Ok(())
        }
        Command::ResetPassword {
            token,
            new_password,
        } => {
            let ack = client.reset_password(&token, &new_password).await?;
            println!("{}", ack.message.unwrap_or_default());
            Ok(())
        }
        Command::Profile { refresh } => profile(client, session, refresh).await,
        Command::List => {
            session.require_admin()?;
            print_table(client).await
        }
        Command::Show { id } => {
            session.require_admin()?;
            let record = client.get_customer(&CustomerId::from(id.as_str())).await?;
            print!("{}", render_record(&record));
            Ok(())
        }
        Command::Add(edit) => add(client, session, edit).await,
        Command::Update { id, edit } => update(client, session, &id, edit).await,
        Command::Delete { id } => {
            session.require_admin()?;
            let ack = client
                .delete_customer(&CustomerId::from(id.as_str()))
                .await?;
            println!("{}", ack.message.unwrap_or_default());
            print_table(client).await
        }
        Command::DeleteAll { yes } => {
            session.require_admin()?;
            if !yes {
                bail!("This deletes every customer. Re-run with --yes to confirm.");
            }
            let ack = client.delete_all_customers().await?;
            println!("{}", ack.message.unwrap_or_default());
            Ok(())
        }
        Command::Upload { file } => upload(client, session, &file).await,
        Command::Export { format, out } => {
            session.require_admin()?;
            export(client, format.into(), out.as_deref()).await
        }
    }
}

async fn signup(client: &InsidersClient, args: SignupArgs) -> anyhow::Result<()> {
    let request = SignupRequest {
        name: args.name,
        email: args.email,
        password: args.password,
        phone: args.phone,
        is_employee: args.employee,
    };
    let record = client.signup(&request).await?;
    println!(
        "Account created for {}. Sign in with `insiders login`.",
        record.display_name()
    );
    Ok(())
}

async fn profile(
    client: &InsidersClient,
    session: &mut SessionContext,
    refresh: bool,
) -> anyhow::Result<()> {
    let mut user = session.require_user()?.clone();
    if refresh {
        user = client.get_customer(user.id()).await?;
        session.set_user(user.clone());
        session.save()?;
    }
    print!("{}", render_profile(&user));
    Ok(())
}

async fn load_table(client: &InsidersClient) -> anyhow::Result<CustomerTable> {
    let mut table = CustomerTable::new();
    table.replace(client.list_customers().await?);
    Ok(table)
}

fn show_table(table: &CustomerTable) {
    print!("{}", render_table(&ExportTable::from_records(table.records())));
    println!("{} customer(s)", table.len());
}

async fn print_table(client: &InsidersClient) -> anyhow::Result<()> {
    show_table(&load_table(client).await?);
    Ok(())
}

async fn add(
    client: &InsidersClient,
    session: &SessionContext,
    edit: EditArgs,
) -> anyhow::Result<()> {
    session.require_admin()?;
    if edit.fields.is_empty() {
        bail!("Nothing to add: pass at least one --set column=value");
    }

    let record = form::draft_record(client.config().profile.schema(), &edit.fields);
    let mut table = load_table(client).await?;
    let pending = table.insert_optimistic(record.clone());

    let mut draft = CustomerDraft::new(record);
    if let Some(password) = edit.password {
        draft = draft.with_password(password);
    }
    match client.add_customer(&draft).await {
        Ok(created) => {
            println!("Added customer {}", created.id());
            table.confirm(&pending, created);
            show_table(&table);
            Ok(())
        }
        Err(e) => {
            table.discard(&pending);
            Err(e.into())
        }
    }
}

async fn update(
    client: &InsidersClient,
    session: &SessionContext,
    id: &str,
    edit: EditArgs,
) -> anyhow::Result<()> {
    session.require_admin()?;
    let id = CustomerId::from(id);
    let current = client.get_customer(&id).await?;
    let edited = form::apply(&current, &edit.fields);

    let update = CustomerUpdate::from_record(&edited).with_password(edit.password);
    let ack = client.update_customer(&id, &update).await?;
    println!(
        "{}",
        ack.message
            .unwrap_or_else(|| "Customer updated successfully".to_string())
    );
    print_table(client).await
}

async fn upload(
    client: &InsidersClient,
    session: &SessionContext,
    file: &Path,
) -> anyhow::Result<()> {
    session.require_admin()?;
    let mut table = CustomerTable::new();
    table.begin_upload();
    let result = client.upload_customers(file).await;
    let details = result
        .as_ref()
        .ok()
        .map(|outcome| (describe_source(&outcome.source), outcome.message.clone()));
    if let Err(e) = table.finish_upload(result) {
        warn!(status = ?table.upload_status(), "Upload did not complete");
        return Err(e).with_context(|| format!("Uploading {}", file.display()));
    }

    print!("{}", render_table(&ExportTable::from_records(table.records())));
    if let UploadStatus::Succeeded { rows } = table.upload_status() {
        info!(rows, "Upload stored");
        println!("{rows} customer(s) uploaded");
    }
    if let Some((source, message)) = details {
        println!("Rows taken from {source}");
        if let Some(message) = message {
            println!("{message}");
        }
    }
    Ok(())
}

async fn export(
    client: &InsidersClient,
    format: ExportFormat,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let table = load_table(client).await?;
    let bytes = format.render(&ExportTable::from_records(table.records()))?;
    let path = out.unwrap_or_else(|| Path::new(format.file_name()));
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Writing {}", path.display()))?;
    println!("Exported {} customer(s) to {}", table.len(), path.display());
    Ok(())
}

/// Where uploaded rows came from, for the summary line
fn describe_source(source: &RowSource) -> String {
    match source {
        RowSource::Backend(shape) => format!("backend response ({shape:?})"),
        RowSource::ClientFallback => "local parse of the uploaded file".to_string(),
    }
}
