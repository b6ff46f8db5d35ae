//! Ticket identifier codec.
//!
//! Maps category labels (speaker, tier, ticket type) to short codes and
//! combines them with a sequence number and a SHA-1 derived suffix:
//!
//! ```text
//! PR-GR-0001-C2A835
//! |  || |    +-- first 6 hex chars of sha1("Pankaj Rai-gold-regular-1")
//! |  || +------- sequence, zero padded to 4 digits
//! |  |+--------- ticket type code
//! |  +---------- tier code
//! +------------- speaker code
//! ```
//!
//! Unknown labels map to `XX` (speaker) or `X` (tier, type) so the ticket is
//! still issued and can be triaged later.

mod codes;
mod identifier;

pub use codes::{CategoryCodes, CodeTableError, CATEGORY_SENTINEL, SPEAKER_SENTINEL};
pub use identifier::{IdentifierCodec, TicketIdentifier};
