use xxhash_rust::const_xxh3::xxh3_64 as const_xxh3_64;

pub const fn method_id_hash(name: &str) -> u64 {
    const_xxh3_64(name.as_bytes())
}

/// Compile-time RPC method ID generator using xxHash3.
///
/// Hashes a string literal into a `u64` in a `const` context, so the ID of
/// an `RpcEvent` never has to be assigned by hand and is identical on every
/// platform.
///
/// ```rust
/// use callmux_rpc_service::rpc_method_id;
/// const LOCATE: u64 = rpc_method_id!("locator.resolve");
/// assert_ne!(LOCATE, rpc_method_id!("locator.refresh"));
/// ```
#[macro_export]
macro_rules! rpc_method_id {
    ($name:literal) => {{
        const ID: u64 = $crate::method_id_hash($name);
        ID
    }};
}
