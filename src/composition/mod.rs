pub(crate) mod background;
pub(crate) mod params;
pub(crate) mod presets;
