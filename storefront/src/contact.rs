//! Supplier contact submissions.
//!
//! Registered suppliers can send the storefront a message with an attached
//! file. The file itself is uploaded to the external blob store by the
//! caller; only its reference is recorded here, together with an immutable
//! submission timestamp.

use crate::errors::ContactError;
use crate::model::{Supplier, SupplierContact};
use crate::store::StorefrontStore;
use crate::types::{ContactMessage, FileRef, UserId};
use tracing::info;

/// Contact-form operations for supplier accounts.
#[derive(Debug, Clone)]
pub struct ContactService<S> {
    store: S,
}

impl<S> ContactService<S>
where
    S: StorefrontStore,
{
    /// Creates the service over a storage port.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Records a contact submission from the supplier linked to `user`.
    ///
    /// Fails with [`ContactError::NotASupplier`] when the user has no
    /// supplier account.
    pub async fn submit(
        &self,
        user: UserId,
        message: ContactMessage,
        file: FileRef,
    ) -> Result<SupplierContact, ContactError> {
        let supplier = self.require_supplier(user).await?;
        let contact = SupplierContact::new(supplier.id, message, file);
        self.store.insert_contact(contact.clone()).await?;
        info!(contact = %contact.id, supplier = %supplier.id, "supplier contact received");
        Ok(contact)
    }

    /// The submissions of the supplier linked to `user`, newest first.
    pub async fn history(&self, user: UserId) -> Result<Vec<SupplierContact>, ContactError> {
        let supplier = self.require_supplier(user).await?;
        Ok(self.store.contacts_for_supplier(supplier.id).await?)
    }

    async fn require_supplier(&self, user: UserId) -> Result<Supplier, ContactError> {
        self.store
            .supplier_for_user(user)
            .await?
            .ok_or(ContactError::NotASupplier(user))
    }
}
