/// The kind of an open container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ContainerKind {
    Object,
    Array,
}

/// The grammar sub-state of an open container. Objects cycle through
/// `JustOpened → AfterName → AfterColon → AfterValue → AfterComma →
/// AfterName → …`; arrays through `JustOpened → AfterValue → AfterComma →
/// AfterValue → …`. Closing is legal in `JustOpened` and `AfterValue`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ContainerState {
    JustOpened,
    AfterName,
    AfterColon,
    AfterValue,
    AfterComma,
}

/// One entry of the container stack. The topmost entry is the container the
/// parser or writer is currently inside.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Container {
    pub kind: ContainerKind,
    pub state: ContainerState,
}

impl Container {
    pub fn new(kind: ContainerKind) -> Self {
        Container {
            kind,
            state: ContainerState::JustOpened,
        }
    }

    /// `true` if a value may begin while this container is on top of the
    /// stack. Inside an object this is only the case after a colon; inside an
    /// array at the beginning and after each comma.
    pub fn expects_value(&self) -> bool {
        match self.kind {
            ContainerKind::Object => self.state == ContainerState::AfterColon,
            ContainerKind::Array => matches!(
                self.state,
                ContainerState::JustOpened | ContainerState::AfterComma
            ),
        }
    }

    /// `true` if an object member name may begin.
    pub fn expects_name(&self) -> bool {
        self.kind == ContainerKind::Object
            && matches!(
                self.state,
                ContainerState::JustOpened | ContainerState::AfterComma
            )
    }

    /// `true` if the container may be closed here.
    pub fn may_close(&self) -> bool {
        matches!(
            self.state,
            ContainerState::JustOpened | ContainerState::AfterValue
        )
    }
}
