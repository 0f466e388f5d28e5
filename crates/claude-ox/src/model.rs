#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    strum::EnumString,
    strum::Display,
    strum::IntoStaticStr,
)]
pub enum Model {
    // Claude 3.7 models (latest)
    #[strum(to_string = "claude-3-7-sonnet-20250219")]
    Claude37Sonnet20250219,
    #[strum(to_string = "claude-3-7-sonnet-latest")]
    Claude37SonnetLatest,

    // Claude 3.5 models
    #[strum(to_string = "claude-3-5-sonnet-20240620")]
    Claude35Sonnet20240620,
    #[strum(to_string = "claude-3-5-sonnet-20241022")]
    Claude35Sonnet20241022,
    #[strum(to_string = "claude-3-5-sonnet-latest")]
    Claude35SonnetLatest,
    #[strum(to_string = "claude-3-5-haiku-20241022")]
    Claude35Haiku20241022,
    #[strum(to_string = "claude-3-5-haiku-latest")]
    Claude35HaikuLatest,

    // Claude 3 models
    #[strum(to_string = "claude-3-opus-20240229")]
    Claude3Opus20240229,
    #[strum(to_string = "claude-3-opus-latest")]
    Claude3OpusLatest,
    #[strum(to_string = "claude-3-sonnet-20240229")]
    Claude3Sonnet20240229,
    #[strum(to_string = "claude-3-haiku-20240307")]
    Claude3Haiku20240307,
}

impl From<Model> for String {
    fn from(model: Model) -> Self {
        model.to_string()
    }
}
