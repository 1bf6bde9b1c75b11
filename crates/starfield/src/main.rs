//! Just `main()`. Keep as small as possible.

use color_eyre::eyre::Result;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let result = starfield::run::run().await;
    tracing::debug!("Starfield is exiting 🙇");

    // `color_eyre` reports the error to the user, this is so the log has it too.
    if let Err(error) = &result {
        tracing::error!("{error:?}");
    }

    result
}
