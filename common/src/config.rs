/// Runtime flags shared by every command.
pub struct Config {
    /// Output volume: 1 drops decoration, 2 drops everything but warnings.
    pub quiet: u8,
    /// Skips the startup banner.
    pub no_banner: bool,
}
