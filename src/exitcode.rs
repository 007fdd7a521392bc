//! Standard exit codes (BSD sysexits.h compatible)
//!
//! Usage errors never reach these: clap reports them itself and exits with 2.

/// Can't create output file
pub const CANTCREAT: i32 = 73;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;

/// Run cancelled while pacing (128 + SIGINT, as shells report it)
pub const INTERRUPTED: i32 = 130;
