/// Formats an error and the whole chain of its sources, one cause per line.
///
/// Used as the `Debug` implementation of the error enums, so that logging an error with `?error`
/// shows what actually went wrong underneath (ex: the transport error behind an embeddings failure).
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
