pub mod messenger;
pub mod poller;
pub mod reminder;
pub mod run_loop;
pub mod sender_pool;
pub mod template;
pub mod user_validator;

pub use messenger::{BlackholeMessenger, Message, Messenger};
pub use run_loop::{run, NotifierConfig};
