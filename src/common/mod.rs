pub mod bit_set;
