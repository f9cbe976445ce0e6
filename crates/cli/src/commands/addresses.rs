//! Saved address management.

use aurelle_core::{Address, AddressDraft, AddressId, AddressType};
use aurelle_storefront::address::{AddressBook, AddressBookError};
use aurelle_storefront::api::ApiClient;
use clap::Args;

use super::{CliError, out};

/// Address fields. On `add` the required ones are checked by validation,
/// on `edit` omitted fields keep their saved value.
#[derive(Debug, Default, Args)]
pub struct AddressArgs {
    /// Label such as "Home"
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub line1: Option<String>,
    #[arg(long)]
    pub line2: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    /// Six-digit PIN code
    #[arg(long)]
    pub postal_code: Option<String>,
    #[arg(long)]
    pub landmark: Option<String>,
    /// Mark as a work address
    #[arg(long)]
    pub work: bool,
    /// Make this the primary address
    #[arg(long)]
    pub primary: bool,
}

impl AddressArgs {
    /// Apply the given fields over `draft`.
    pub fn apply(&self, mut draft: AddressDraft) -> AddressDraft {
        let set = |target: &mut String, value: &Option<String>| {
            if let Some(value) = value {
                target.clone_from(value);
            }
        };
        set(&mut draft.title, &self.title);
        set(&mut draft.address_line1, &self.line1);
        set(&mut draft.city, &self.city);
        set(&mut draft.state, &self.state);
        set(&mut draft.postal_code, &self.postal_code);
        if self.line2.is_some() {
            draft.address_line2.clone_from(&self.line2);
        }
        if self.landmark.is_some() {
            draft.landmark.clone_from(&self.landmark);
        }
        if self.work {
            draft.address_type = AddressType::Work;
        }
        if self.primary {
            draft.is_primary = true;
        }
        draft
    }
}

/// List saved addresses.
pub async fn list(api: &ApiClient) -> Result<(), CliError> {
    let addresses = api.list_addresses().await?;
    if addresses.is_empty() {
        out("No saved addresses");
    }
    for address in &addresses {
        print_address(address);
    }
    Ok(())
}

/// Add an address.
pub async fn add(api: &ApiClient, fields: &AddressArgs) -> Result<(), CliError> {
    let draft = fields.apply(AddressDraft::default());
    let mut book = AddressBook::new(0, api.list_addresses().await?)
        .on_select(|selected| {
            if let Some(address) = selected {
                tracing::info!("Selected address {}", address.id);
            }
        });

    let address = book.create(api, &draft).await.inspect_err(report)?;
    out(format!("Added address {}", address.id));
    print_address(&address);
    Ok(())
}

/// Edit an address.
pub async fn edit(api: &ApiClient, id: &str, fields: &AddressArgs) -> Result<(), CliError> {
    let id = AddressId::new(id);
    let mut book = AddressBook::new(0, api.list_addresses().await?);
    let current = book
        .list()
        .iter()
        .find(|a| a.id == id)
        .ok_or_else(|| CliError::NotFound(format!("address {id}")))?;

    let draft = fields.apply(current.to_draft());
    let address = book.update(api, &id, &draft).await.inspect_err(report)?;
    out(format!("Updated address {}", address.id));
    print_address(&address);
    Ok(())
}

/// Remove an address.
pub async fn remove(api: &ApiClient, id: &str) -> Result<(), CliError> {
    let id = AddressId::new(id);
    let mut book = AddressBook::new(0, api.list_addresses().await?);
    book.delete(api, &id).await.inspect_err(report)?;
    out(format!("Removed address {id}"));
    Ok(())
}

fn report(err: &AddressBookError) {
    if let AddressBookError::Invalid(errors) = err {
        for (field, message) in errors.iter() {
            out(format!("  {}: {message}", field.as_str()));
        }
    }
}

fn print_address(address: &Address) {
    let primary = if address.is_primary { " (primary)" } else { "" };
    out(format!(
        "{} [{:?}] {}{primary}",
        address.id, address.address_type, address.title
    ));
    for line in address.lines() {
        out(format!("    {line}"));
    }
}
