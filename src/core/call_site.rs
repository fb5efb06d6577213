//! Call-site metadata captured by the logging macros
//!
//! A [`CallSite`] describes the lexical location of a log statement. Its
//! `hash` identifies the location, not the message, and is computed at
//! compile time so the level resolver can cache one decision per site.

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

const fn fnv_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

/// FNV-1a over the file path, line and column of a log statement.
pub const fn hash_location(file: &str, line: u32, column: u32) -> u64 {
    let hash = fnv_bytes(FNV_OFFSET, file.as_bytes());
    let hash = fnv_bytes(hash, &line.to_le_bytes());
    fnv_bytes(hash, &column.to_le_bytes())
}

/// Strip `::{{closure}}` segments left by `type_name` when the log
/// statement sits inside one or more closures.
#[doc(hidden)]
pub fn trim_closures(mut path: &'static str) -> &'static str {
    while let Some(stripped) = path.strip_suffix("::{{closure}}") {
        path = stripped;
    }
    path
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub module: &'static str,
    /// Bare function name, e.g. `connect`
    pub function: &'static str,
    /// Fully qualified function path, e.g. `app::net::Client::connect`
    pub extended_function: &'static str,
    pub class: Option<&'static str>,
    pub hash: u64,
}

impl CallSite {
    pub fn new(
        file: &'static str,
        line: u32,
        module: &'static str,
        extended_function: &'static str,
        hash: u64,
    ) -> Self {
        let function = extended_function
            .rsplit("::")
            .next()
            .unwrap_or(extended_function);

        Self {
            file,
            line,
            module,
            function,
            extended_function,
            class: None,
            hash,
        }
    }

    #[must_use]
    pub fn with_class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }
}

/// Fully qualified path of the enclosing function, as a `&'static str`.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __logxx_here() {}
        fn __logxx_type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __logxx_type_name_of(__logxx_here);
        let name = name.strip_suffix("::__logxx_here").unwrap_or(name);
        $crate::core::call_site::trim_closures(name)
    }};
}

/// Capture the [`CallSite`] of the invoking statement.
#[macro_export]
macro_rules! call_site {
    () => {{
        const __LOGXX_HASH: u64 =
            $crate::core::call_site::hash_location(file!(), line!(), column!());
        $crate::CallSite::new(
            file!(),
            line!(),
            module_path!(),
            $crate::function_name!(),
            __LOGXX_HASH,
        )
    }};
}
