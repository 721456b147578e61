// SPDX-License-Identifier: MIT

/// Generates the `From` conversions between the layer errors and `FsError`.
///
/// `top` lists the layer errors wrapped by the crate error, `str_into` the
/// errors that accept a static message as `Other`, and `sub` the layer
/// errors nested inside other layers.
#[macro_export]
macro_rules! fs_error_wiring {
    (
        top => $top:ty {
            $($layer:ty : $layer_variant:ident),+ $(,)?
        },
        str_into => [ $($msg_target:ty),* $(,)? ],
        sub => {
            $($inner:ty => [ $($outer:ident::$outer_variant:ident),+ ] ),* $(,)?
        } $(,)?
    ) => {
        $crate::__impl_into_fserror!{ $top; $( $layer => $layer_variant ),+ }
        $crate::__impl_str_into_errors!{ $top; $( $msg_target ),* }
        $crate::__impl_sub_into_error!{ $( $inner => [ $( $outer :: $outer_variant ),+ ] ),* }
    };
}

#[macro_export]
macro_rules! __impl_into_fserror {
    ($top:ty; $($t:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$t> for $top {
                #[inline]
                fn from(e: $t) -> Self { <$top>::$variant(e) }
            }
        )+
    }
}

#[macro_export]
macro_rules! __impl_str_into_errors {
    ($top:ty; $($t:ty),* $(,)?) => {
        $(
            impl From<&'static str> for $t {
                #[inline]
                fn from(msg: &'static str) -> Self { <$t>::Other(msg) }
            }
        )*
        impl From<&'static str> for $top {
            #[inline]
            fn from(msg: &'static str) -> Self { <$top>::Other(msg) }
        }
    }
}

#[macro_export]
macro_rules! __impl_sub_into_error {
    ($($src:ty => [ $( $dst:ident::$variant:ident ),+ ] ),* $(,)?) => {
        $(
            $(
                impl From<$src> for $dst {
                    #[inline]
                    fn from(e: $src) -> Self { <$dst>::$variant(e) }
                }
            )+
        )*
    }
}
