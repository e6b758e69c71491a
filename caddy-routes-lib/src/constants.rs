/// Name given to a server synthesized during merge or textual adaptation
pub const DEFAULT_SERVER_NAME: &str = "srv0";

/// Listen address given to a synthesized server
pub const DEFAULT_LISTEN_ADDR: &str = ":443";

/// Indentation of rendered directive lines.
/// Flat regardless of nesting depth since nested subroutes are flattened into the parent block.
pub const RENDER_INDENT: &str = "    ";
