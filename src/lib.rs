pub mod big_int;

pub use big_int::{BigInt, DivideByZero, Error, FromStrErr};

mod util {
    pub mod rng;
}
