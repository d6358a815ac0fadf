//! Debug trace levels, mirroring mincss's `debug_trace` context field and
//! the CLI's `-l`/`-t` flags (spec §6).

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TraceLevel {
    #[default]
    Off,
    /// Stop after lexing; the CLI prints each token.
    Lexer,
    /// Stop after building the untyped tree; the CLI dumps it.
    Tree,
}
