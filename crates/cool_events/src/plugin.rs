//! # Plugin Lifecycle
//!
//! Plugins implement [`SimplePlugin`] and expose themselves with
//! [`create_simple_plugin!`](crate::create_simple_plugin), which wraps the
//! plugin in a panic-isolating [`Plugin`] implementation the host drives.
//!
//! 1. **Creation**: the plugin is built through `Default`
//! 2. **Handler Registration**: `register_handlers()` wires event handlers
//! 3. **Initialization**: `on_init()` reads config and registers commands
//! 4. **Operation**: the plugin reacts to events
//! 5. **Shutdown**: `on_shutdown()` releases state

use crate::context::ServerContext;
use crate::system::EventSystem;
use async_trait::async_trait;
use std::sync::Arc;

/// High-level plugin interface.
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct ChatPlugin;
///
/// #[async_trait]
/// impl SimplePlugin for ChatPlugin {
///     fn name(&self) -> &str { "chat" }
///     fn version(&self) -> &str { "1.0.0" }
///
///     async fn register_handlers(
///         &mut self,
///         events: Arc<EventSystem>,
///         context: Arc<dyn ServerContext>,
///     ) -> Result<(), PluginError> {
///         events.on_client("chat", "message", |event: PlayerChatEvent| {
///             println!("{}", event.message);
///             Ok(())
///         }).await.map_err(|e| PluginError::InitializationFailed(e.to_string()))
///     }
/// }
///
/// create_simple_plugin!(ChatPlugin);
/// ```
#[async_trait]
pub trait SimplePlugin: Send + Sync + 'static {
    /// Unique, stable plugin name. Also the key of its config section.
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    /// Registers event handlers. Called before `on_init()`.
    async fn register_handlers(
        &mut self,
        events: Arc<EventSystem>,
        context: Arc<dyn ServerContext>,
    ) -> Result<(), PluginError>;

    /// Called after handler registration. Failing here prevents the plugin
    /// from becoming active.
    async fn on_init(&mut self, _context: Arc<dyn ServerContext>) -> Result<(), PluginError> {
        Ok(())
    }

    /// Called when the host shuts down. Errors are logged, not fatal.
    async fn on_shutdown(&mut self, _context: Arc<dyn ServerContext>) -> Result<(), PluginError> {
        Ok(())
    }
}

/// Low-level plugin interface the host drives.
///
/// Generated by [`create_simple_plugin!`](crate::create_simple_plugin); host
/// code should not need to implement it by hand.
#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    /// Handler registration phase.
    async fn pre_init(&mut self, context: Arc<dyn ServerContext>) -> Result<(), PluginError>;

    /// Initialization phase with full context access.
    async fn init(&mut self, context: Arc<dyn ServerContext>) -> Result<(), PluginError>;

    async fn shutdown(&mut self, context: Arc<dyn ServerContext>) -> Result<(), PluginError>;
}

/// Errors that can occur during plugin operations.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// Plugin initialization failed during startup
    #[error("Plugin initialization failed: {0}")]
    InitializationFailed(String),
    /// Error occurred during plugin execution
    #[error("Plugin execution error: {0}")]
    ExecutionError(String),
    /// Plugin configuration was rejected
    #[error("Plugin configuration error: {0}")]
    InvalidConfig(String),
    /// Panic or other unexpected runtime condition
    #[error("Plugin runtime error: {0}")]
    Runtime(String),
}

/// Turns a panic payload into a [`PluginError::Runtime`].
#[doc(hidden)]
pub fn panic_to_error(panic_info: Box<dyn std::any::Any + Send>) -> PluginError {
    let message = if let Some(s) = panic_info.downcast_ref::<&str>() {
        format!("Plugin panicked: {}", s)
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        format!("Plugin panicked: {}", s)
    } else {
        "Plugin panicked with unknown error".to_string()
    };

    PluginError::Runtime(message)
}

/// Generates the [`Plugin`] wrapper for a [`SimplePlugin`] type and a
/// `create_plugin()` constructor the host links against.
///
/// Every lifecycle call is wrapped in `catch_unwind`, so a panicking plugin
/// surfaces as `PluginError::Runtime` instead of taking the host down.
///
/// The plugin type must implement `Default`.
#[macro_export]
macro_rules! create_simple_plugin {
    ($plugin_type:ty) => {
        struct PluginWrapper {
            inner: $plugin_type,
        }

        #[$crate::async_trait]
        impl $crate::Plugin for PluginWrapper {
            fn name(&self) -> &str {
                match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| {
                    $crate::SimplePlugin::name(&self.inner)
                })) {
                    Ok(name) => name,
                    Err(_) => "unknown-plugin-name",
                }
            }

            fn version(&self) -> &str {
                match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| {
                    $crate::SimplePlugin::version(&self.inner)
                })) {
                    Ok(version) => version,
                    Err(_) => "unknown-version",
                }
            }

            async fn pre_init(
                &mut self,
                context: ::std::sync::Arc<dyn $crate::ServerContext>,
            ) -> ::std::result::Result<(), $crate::PluginError> {
                use $crate::__private::futures::FutureExt;
                let events = $crate::ServerContext::events(&*context);
                ::std::panic::AssertUnwindSafe($crate::SimplePlugin::register_handlers(
                    &mut self.inner,
                    events,
                    context,
                ))
                .catch_unwind()
                .await
                .map_err($crate::__private::panic_to_error)?
            }

            async fn init(
                &mut self,
                context: ::std::sync::Arc<dyn $crate::ServerContext>,
            ) -> ::std::result::Result<(), $crate::PluginError> {
                use $crate::__private::futures::FutureExt;
                ::std::panic::AssertUnwindSafe($crate::SimplePlugin::on_init(
                    &mut self.inner,
                    context,
                ))
                .catch_unwind()
                .await
                .map_err($crate::__private::panic_to_error)?
            }

            async fn shutdown(
                &mut self,
                context: ::std::sync::Arc<dyn $crate::ServerContext>,
            ) -> ::std::result::Result<(), $crate::PluginError> {
                use $crate::__private::futures::FutureExt;
                ::std::panic::AssertUnwindSafe($crate::SimplePlugin::on_shutdown(
                    &mut self.inner,
                    context,
                ))
                .catch_unwind()
                .await
                .map_err($crate::__private::panic_to_error)?
            }
        }

        /// Builds the plugin for the host.
        pub fn create_plugin() -> ::std::boxed::Box<dyn $crate::Plugin> {
            ::std::boxed::Box::new(PluginWrapper {
                inner: <$plugin_type as ::std::default::Default>::default(),
            })
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{LogLevel, Particle, ServerError, Sound, Viewers};
    use crate::types::{PlayerId, Position};
    use crate::ServerTickEvent;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullContext {
        events: Arc<EventSystem>,
    }

    impl ServerContext for NullContext {
        fn events(&self) -> Arc<EventSystem> {
            self.events.clone()
        }
        fn log(&self, _level: LogLevel, _message: &str) {}
        fn current_tick(&self) -> u64 {
            0
        }
        fn player_name(&self, _player_id: PlayerId) -> Option<String> {
            None
        }
        fn find_player_by_prefix(&self, _query: &str) -> Option<PlayerId> {
            None
        }
        fn find_player_exact(&self, _name: &str) -> Option<PlayerId> {
            None
        }
        fn online_players(&self) -> Vec<PlayerId> {
            Vec::new()
        }
        fn player_position(&self, _player_id: PlayerId) -> Option<Position> {
            None
        }
        fn send_message(&self, player_id: PlayerId, _message: &str) -> Result<(), ServerError> {
            Err(ServerError::PlayerOffline(player_id))
        }
        fn send_console_message(&self, _message: &str) {}
        fn set_chat_format(&self, _player_id: PlayerId, _line: String) {}
        fn cancel_interaction(&self, _player_id: PlayerId) {}
        fn teleport(&self, player_id: PlayerId, _to: Position) -> Result<(), ServerError> {
            Err(ServerError::PlayerOffline(player_id))
        }
        fn spawn_particle(&self, _at: Position, _particle: Particle, _viewers: Viewers) {}
        fn play_sound(&self, _at: Position, _sound: Sound) {}
        fn allows_flight(&self, _player_id: PlayerId) -> bool {
            false
        }
        fn set_allow_flight(&self, _player_id: PlayerId, _allow: bool) {}
        fn set_flying(&self, _player_id: PlayerId, _flying: bool) {}
        fn heal(&self, _player_id: PlayerId) {}
        fn set_movement_speed(&self, _player_id: PlayerId, _speed: f32) {}
        fn register_command(&self, _name: &str, _usage: &str) {}
        fn plugin_config(&self, _plugin_name: &str) -> Option<serde_json::Value> {
            None
        }
    }

    #[derive(Default)]
    struct TickCounter {
        ticks: Arc<AtomicUsize>,
        panic_on_init: bool,
    }

    #[async_trait]
    impl SimplePlugin for TickCounter {
        fn name(&self) -> &str {
            "tick_counter"
        }

        fn version(&self) -> &str {
            "0.1.0"
        }

        async fn register_handlers(
            &mut self,
            events: Arc<EventSystem>,
            _context: Arc<dyn ServerContext>,
        ) -> Result<(), PluginError> {
            let ticks = self.ticks.clone();
            events
                .on_core("server_tick", move |_event: ServerTickEvent| {
                    ticks.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .await
                .map_err(|e| PluginError::InitializationFailed(e.to_string()))
        }

        async fn on_init(&mut self, _context: Arc<dyn ServerContext>) -> Result<(), PluginError> {
            if self.panic_on_init {
                panic!("init exploded");
            }
            Ok(())
        }
    }

    crate::create_simple_plugin!(TickCounter);

    #[tokio::test]
    async fn test_wrapper_drives_lifecycle() {
        let context: Arc<dyn ServerContext> = Arc::new(NullContext {
            events: Arc::new(EventSystem::new()),
        });

        let mut plugin = create_plugin();
        assert_eq!(plugin.name(), "tick_counter");
        assert_eq!(plugin.version(), "0.1.0");

        plugin.pre_init(context.clone()).await.expect("pre_init failed");
        plugin.init(context.clone()).await.expect("init failed");

        let stats = context.events().get_stats().await;
        assert_eq!(stats.total_handlers, 1);

        plugin.shutdown(context).await.expect("shutdown failed");
    }

    #[tokio::test]
    async fn test_wrapper_converts_panics() {
        let context: Arc<dyn ServerContext> = Arc::new(NullContext {
            events: Arc::new(EventSystem::new()),
        });

        let mut wrapper = PluginWrapper {
            inner: TickCounter {
                panic_on_init: true,
                ..TickCounter::default()
            },
        };

        let result = Plugin::init(&mut wrapper, context).await;
        match result {
            Err(PluginError::Runtime(message)) => assert!(message.contains("init exploded")),
            other => panic!("expected runtime error, got {:?}", other.map(|_| ())),
        }
    }
}
