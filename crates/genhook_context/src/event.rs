//! The closed catalogue of code-generation lifecycle events.
//!
//! Every point in the generator where plugins may intervene is named by an
//! [`EventName`]. The set is fixed at compile time; plugins register handlers
//! against these names and the generator wraps its default implementation of
//! each event with them.
//!
//! # Example
//!
//! ```
//! use genhook_context::event::EventName;
//!
//! let event: EventName = "CreateEntityModule".parse().unwrap();
//! assert_eq!(event, EventName::CreateEntityModule);
//! assert_eq!(event.to_string(), "CreateEntityModule");
//! ```

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing a string that names no known event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event name: {0}")]
pub struct UnknownEventName(pub String);

macro_rules! event_names {
    ($($(#[$doc:meta])* $variant:ident,)+) => {
        /// A named point in the code-generation lifecycle.
        ///
        /// The wire name of each event (used by [`Display`](fmt::Display),
        /// [`FromStr`] and serde) is the variant name itself.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum EventName {
            $($(#[$doc])* $variant,)+
        }

        impl EventName {
            /// Every event, in declaration order.
            pub const ALL: &'static [EventName] = &[$(EventName::$variant,)+];

            /// Returns the wire name of this event.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(EventName::$variant => stringify!($variant),)+
                }
            }
        }

        impl FromStr for EventName {
            type Err = UnknownEventName;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok(EventName::$variant),)+
                    other => Err(UnknownEventName(other.to_owned())),
                }
            }
        }
    };
}

event_names! {
    // ─────────────────────────────────────────────────────────────────────────
    // Entity Events
    // ─────────────────────────────────────────────────────────────────────────
    /// Renders the module file that ties an entity's service and controller together.
    CreateEntityModule,
    /// Renders the regenerated base of an entity module.
    CreateEntityModuleBase,
    /// Renders an entity's HTTP controller.
    CreateEntityController,
    /// Renders the regenerated base of an entity controller.
    CreateEntityControllerBase,
    /// Renders controller methods for an entity's to-many relations.
    CreateEntityControllerToManyRelationMethods,
    /// Renders an entity's service.
    CreateEntityService,
    /// Renders the regenerated base of an entity service.
    CreateEntityServiceBase,
    /// Renders an entity's GraphQL resolver.
    CreateEntityResolver,
    /// Renders the regenerated base of an entity resolver.
    CreateEntityResolverBase,
    /// Renders the data transfer objects of all entities.
    CreateDTOs,

    // ─────────────────────────────────────────────────────────────────────────
    // Server Events
    // ─────────────────────────────────────────────────────────────────────────
    /// Renders the whole server application.
    CreateServer,
    /// Renders the server's root application module.
    CreateServerAppModule,
    /// Renders the server's authentication layer.
    CreateServerAuth,
    /// Renders the server's `.env` file.
    CreateServerDotEnv,
    /// Renders the server's docker compose file.
    CreateServerDockerCompose,
    /// Renders the docker compose file for the server's database.
    CreateServerDockerComposeDB,
    /// Renders the server's `.gitignore`.
    CreateServerGitIgnore,
    /// Renders the server's package manifest.
    CreateServerPackageJson,
    /// Renders the database schema.
    CreatePrismaSchema,
    /// Renders the database seed script.
    CreateSeed,
    /// Renders the API documentation setup.
    CreateSwagger,
    /// Renders the message broker integration.
    CreateMessageBroker,

    // ─────────────────────────────────────────────────────────────────────────
    // Admin UI Events
    // ─────────────────────────────────────────────────────────────────────────
    /// Renders the whole admin UI application.
    CreateAdminUI,
    /// Renders the admin UI's `.env` file.
    CreateAdminDotEnv,
    /// Renders the admin UI's `.gitignore`.
    CreateAdminGitIgnore,
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
