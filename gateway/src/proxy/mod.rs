pub mod context;
mod handler;

pub use context::BoxBody;
pub use handler::{
    echo_response, handle_request, not_found, BranchHandler, BranchHandlers, EchoHandler,
    HandlerFuture,
};
