mod build;
mod commands;
mod config;
mod discord;
mod handler;
mod logging;

fn main() -> anyhow::Result<()> {
    use std::borrow::Cow;
    use std::panic;
    use std::sync::Arc;

    use anyhow::{Context as _, Result};
    use arcade_core::Arcade;
    use arcade_core::random::ThreadDice;
    use arcade_core::stats::{JsonFile, StatsStore};
    use serenity::all::{Client, GatewayIntents};
    use serenity::gateway::ActivityData;
    use serenity::http::Http;

    use crate::build::{GIT_HASH, VERSION};
    use crate::config::Config;
    use crate::discord::DiscordMessenger;
    use crate::handler::ArcadeHandler;

    return inner();

    // short async fn to reduce `tokio::main` scope
    #[tokio::main]
    async fn inner() -> Result<()> {
        let res = run().await;
        if let Err(why) = &res {
            log::error!("Exiting due to error: {why:?}");
        }

        log::logger().flush();
        res
    }

    async fn run() -> Result<()> {
        let config = build_config()?;
        init_logging(config.log.log4rs)?;

        if config.log.panic {
            // register the custom panic handler after logging is set up
            panic::set_hook(Box::new(on_panic));
        }

        log::info!(target: "arcade_app::version", "Arcade v{VERSION} - {GIT_HASH}");

        let bot = config.bot;
        let stats_file = JsonFile::new(&bot.stats_path);
        let stats = StatsStore::open(Box::new(stats_file))
            .with_context(|| format!("cannot open stats at {:?}", bot.stats_path))?;

        let http = Arc::new(Http::new(&config.discord.token));
        let me = http
            .get_current_user()
            .await
            .context("cannot fetch the bot user")?;

        let arcade = Arcade::new(
            DiscordMessenger::new(http, bot.embed_color),
            stats,
            Box::new(ThreadDice),
            arcade_core::UserId(me.id.get()),
            bot.settings(),
        );

        let handler = ArcadeHandler::new(Arc::new(arcade), bot.prefix);
        let status = config
            .discord
            .status
            .unwrap_or_else(|| VERSION.to_owned());

        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
            | GatewayIntents::GUILD_MESSAGE_REACTIONS
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::DIRECT_MESSAGE_REACTIONS;

        let mut client = Client::builder(&config.discord.token, intents)
            .activity(ActivityData::custom(status))
            .event_handler(handler)
            .await
            .context("failed to init discord client")?;

        client
            .start()
            .await
            .context("discord client shut down unexpectedly")
    }

    /// Writes the panic to the logger and flushes it.
    fn on_panic(info: &panic::PanicHookInfo<'_>) {
        use std::backtrace::Backtrace;
        use std::io::{Write as _, stdout};

        // always include the backtrace, even when not enabled
        let backtrace = Backtrace::force_capture();
        let thread = std::thread::current();
        let name = thread.name().unwrap_or("<unnamed>");

        // in case the loggers fail or are empty
        _ = writeln!(stdout(), "thread '{name}' {info}");
        log::error!("thread '{name}' {info}\n{backtrace}");
        log::logger().flush();
    }

    fn profile() -> Result<Cow<'static, str>> {
        use std::env::VarError::NotPresent;
        use std::env::var;

        match var("ARCADE_PROFILE") {
            Ok(value) => Ok(value.into()),
            Err(NotPresent) => Ok("release".into()),
            Err(err) => Err(err).context("cannot load ARCADE_PROFILE env variable"),
        }
    }

    fn build_config() -> Result<Config> {
        use crate::config::setup::{Builder, Env, File, TomlText};

        let profile = profile()?;
        let profile_config = format!("arcade_app.{profile}.toml");
        let default_config = include_str!("../assets/default_config.toml");

        Builder::new()
            .add_layer(TomlText::new(default_config))
            .add_layer(File::new("arcade_app.toml").required(false))
            .add_layer(File::new(&profile_config).required(false))
            .add_layer(Env::prefixed("ARCADE_"))
            .build()
    }

    fn init_logging(config: log4rs::config::RawConfig) -> Result<()> {
        let deserializers = crate::logging::deserializers();
        let (appenders, errors) = config.appenders_lossy(&deserializers);
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let config = log4rs::Config::builder()
            .appenders(appenders)
            .loggers(config.loggers())
            .build(config.root())?;

        log4rs::init_config(config)?;
        Ok(())
    }
}
