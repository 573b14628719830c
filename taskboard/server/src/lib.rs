pub mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
    pub struct Config {
        #[serde(default = "default_db_url")]
        pub db_url: String,
        #[serde(default = "default_port")]
        pub port: u16,
    }

    impl Config {
        /// Loads configuration from environment variables (`DB_URL`, `PORT`).
        pub fn from_env() -> anyhow::Result<Self> {
            let builder = config::Config::builder().add_source(config::Environment::default());
            Self::from_builder(builder)
        }

        fn from_builder(
            builder: config::ConfigBuilder<config::builder::DefaultState>,
        ) -> anyhow::Result<Self> {
            let settings = builder.build()?;
            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }
    }

    fn default_db_url() -> String {
        "sqlite://taskboard.db?mode=rwc".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

}
pub mod board;
pub mod db;
pub mod entities;
pub mod task;
pub mod web;
