mod grammar;
mod host;
mod matcher;
mod router;
mod vars;

pub use grammar::{
    FOREIGN_ORIGIN_VAR, FOREIGN_PATH_VAR, RESERVED_CAPTURE_NAMES, WORKSPACE_ID_VAR,
    WORKSPACE_PORT_VAR,
};
pub use host::{HostSource, FORWARDED_HOST_HEADER};
pub use matcher::{BlobserveMatcher, HostMatcher, PortMatcher, WorkspaceMatcher};
pub use router::{Branch, RouteBranch, RouteMatch, WorkspaceRouter};
pub use vars::{RouteVars, WorkspaceCoords};
