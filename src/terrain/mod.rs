pub mod hillshade;
