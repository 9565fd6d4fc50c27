pub(crate) mod format;
pub(crate) mod hand;
pub(crate) mod layout;
pub(crate) mod motion;
pub(crate) mod scene;
pub(crate) mod timeline;
