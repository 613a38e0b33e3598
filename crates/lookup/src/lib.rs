pub mod client;
pub mod coordinator;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod policy;
pub mod testing;

pub use client::{HttpProfileApi, ProfileApi};
pub use coordinator::NavigationCoordinator;
pub use engine::{LookupEngine, LookupOutcome};
pub use errors::{LookupError, ResolveError};
pub use policy::{default_policy, load_policy, EndpointPolicy, LookupPolicy, PolicyError};
