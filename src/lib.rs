//! Audit-log subsystem translator.
//!
//! Re-exports the management model and the XML translator, and adds
//! [`load_subsystem`] for the common decode-then-apply path.

pub use auditlog_xml as xml;
pub use mgmt_model as model;

use auditlog_xml::{decode_str, DecodeContext, XmlError};
use mgmt_model::{ManagementModel, ModelError};
use thiserror::Error;
use tracing::debug;

/// Failure of [`load_subsystem`].
#[derive(Debug, Error)]
pub enum Error {
    /// The document was rejected by the decoder.
    #[error(transparent)]
    Decode(#[from] XmlError),
    /// The operations could not be applied to the model.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Decode `xml` and apply the operations to a model seeded with the
/// context's base address.
pub fn load_subsystem(xml: &str, context: &DecodeContext) -> Result<ManagementModel, Error> {
    let operations = decode_str(xml, context)?;
    let mut model = ManagementModel::with_path(&context.base);
    model.apply(&operations)?;
    debug!(
        base = %context.base,
        operations = operations.len(),
        "loaded audit-log subsystem"
    );
    Ok(model)
}
