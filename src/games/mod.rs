pub mod geography;
