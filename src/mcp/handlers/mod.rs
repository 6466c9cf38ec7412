pub(crate) mod read_screen;
