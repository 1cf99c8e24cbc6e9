// Macros to emit events, compiled away without the `tracing` feature.
// Arguments are forwarded as raw tokens, so `tracing`'s field syntax
// (`count = n`, `%value`, `?value`) is available.

#[doc(hidden)]
#[macro_export]
macro_rules! __codegen_trace_internal {
    ($trace_type:ident; $($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        {
            $crate::tracing::$trace_type!($($arg)*);
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __codegen_trace {
    ($($arg:tt)*) => {{
        $crate::__codegen_trace_internal!(trace; $($arg)*)
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __codegen_trace_debug {
    ($($arg:tt)*) => {{
        $crate::__codegen_trace_internal!(debug; $($arg)*)
    }};
}

// Macros to instrument (non-future) spans.

#[doc(hidden)]
#[macro_export]
macro_rules! __codegen_span_internal {
    ($trace_type:ident; $($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        let span = $crate::tracing::span!($crate::tracing::Level::$trace_type, $($arg)*);
        #[cfg(feature = "tracing")]
        let _enter = span.enter();
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __codegen_span_debug {
    ($($arg:tt)*) => {
        $crate::__codegen_span_internal!(DEBUG; $($arg)*);
    };
}
