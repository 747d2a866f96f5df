//! Inter-node request transport: a layered RPC fabric used by transaction
//! servers (active/passive) and page servers (spec §2A, §4.1-§4.8).

pub mod async_disconnect;
pub mod channel;
pub mod duplex;
pub mod error;
pub mod queue;
pub mod request_client;
pub mod request_client_server;
pub mod request_server;
pub mod response_broker;
pub mod rsn;
pub mod tran_server;

pub use channel::Channel;
pub use duplex::{RequestSyncClientServer, SequencedPayload};
pub use error::{Error, Result};
pub use request_client::RequestClient;
pub use request_client_server::RequestClientServer;
pub use request_server::RequestServer;
pub use response_broker::ResponseBroker;
pub use rsn::SequenceNumberGenerator;
pub use tran_server::TranServer;
