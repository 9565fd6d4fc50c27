pub(crate) mod youtube;
