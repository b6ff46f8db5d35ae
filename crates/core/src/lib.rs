pub mod batch;
pub mod codec;
pub mod config;
pub mod credentials;
pub mod mailer;
pub mod metrics;
pub mod renderer;
pub mod roster;
pub mod template;
pub mod testing;

pub use batch::{BatchError, BatchReport, BatchRunner, BatchSettings, RowOutcome, SkipReason};
pub use codec::{CategoryCodes, IdentifierCodec, TicketIdentifier};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, CredentialMethod,
    SanitizedConfig,
};
pub use credentials::{
    create_credential_provider, CredentialError, CredentialProvider, Credentials,
};
pub use mailer::{MailError, MailSession, Mailer, SmtpMailer};
pub use renderer::{ImageRenderer, RenderError, Renderer};
pub use roster::{Roster, RosterError};
pub use template::TemplateResolver;
