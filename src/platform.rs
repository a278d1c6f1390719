//! Marker traits that relax `Send`/`Sync` bounds on single-threaded WASM
//! targets, where HTTP clients and their futures are usually `!Send`.

macro_rules! platform_marker {
    ($(#[$meta:meta])* $name:ident: $($bound:tt)+) => {
        $(#[$meta])*
        #[cfg(not(all(target_arch = "wasm32", any(target_os = "unknown", target_os = "none"))))]
        pub trait $name: $($bound)+ {}
        #[cfg(not(all(target_arch = "wasm32", any(target_os = "unknown", target_os = "none"))))]
        impl<T: $($bound)+> $name for T {}

        $(#[$meta])*
        #[cfg(all(target_arch = "wasm32", any(target_os = "unknown", target_os = "none")))]
        pub trait $name {}
        #[cfg(all(target_arch = "wasm32", any(target_os = "unknown", target_os = "none")))]
        impl<T> $name for T {}
    };
}

platform_marker!(
    /// Marker trait for types that may be `Send`, depending on platform.
    MaybeSend: Send
);

platform_marker!(
    /// Marker trait for types that may be `Send + Sync`, depending on platform.
    MaybeSendSync: Send + Sync
);
