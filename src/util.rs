/// Generates a by-value builder setter for `$field`.
macro_rules! impl_setter {
    ($self:ident, $field:ident, $type:ty) => {
        pub fn $field(mut $self, $field: $type) -> Self {
            $self.$field = $field;
            $self
        }
    };
}

/// Whether the time budget ran out or an interrupt was received.
#[inline]
pub(crate) fn should_stop() -> bool {
    #[cfg(feature = "handle-ctrlc")]
    if crate::signals::received_ctrl_c() {
        return true;
    }
    #[cfg(feature = "cli")]
    if crate::timeout::timeout() {
        return true;
    }
    false
}
