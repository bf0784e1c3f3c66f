pub mod fade;
pub mod frame;
pub mod hit;
pub mod paint;

pub use fade::{HandleFade, step};
pub use frame::{CardChrome, DraftConnector, GridLayout, Theme};
pub use hit::{ConnectorHit, ConnectorPart, hit_card, hit_connector, hit_connector_handle, infer_anchor};
