//! `std::ops` sugar over the recorded primitives.
//!
//! Operators cannot propagate `Result`, so shape errors panic with the
//! underlying message. Code that needs to handle those errors should call
//! the function forms in [`crate::ops`] directly.

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::ops;
use crate::variable::Variable;

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $func:path, $symbol:literal) => {
        impl $trait<&Variable> for &Variable {
            type Output = Variable;

            fn $method(self, rhs: &Variable) -> Variable {
                match $func(self, rhs) {
                    Ok(result) => result,
                    Err(e) => panic!(concat!("variable `", $symbol, "` failed: {}"), e),
                }
            }
        }

        impl $trait<f64> for &Variable {
            type Output = Variable;

            fn $method(self, rhs: f64) -> Variable {
                self.$method(&Variable::scalar(rhs))
            }
        }

        impl $trait<&Variable> for f64 {
            type Output = Variable;

            fn $method(self, rhs: &Variable) -> Variable {
                (&Variable::scalar(self)).$method(rhs)
            }
        }
    };
}

binary_operator!(Add, add, ops::add, "+");
binary_operator!(Sub, sub, ops::sub, "-");
binary_operator!(Mul, mul, ops::mul, "*");
binary_operator!(Div, div, ops::div, "/");

impl Neg for &Variable {
    type Output = Variable;

    fn neg(self) -> Variable {
        match ops::neg(self) {
            Ok(result) => result,
            Err(e) => panic!("variable `-` failed: {}", e),
        }
    }
}
