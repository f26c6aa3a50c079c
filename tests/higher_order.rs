//! Higher-order differentiation: backward recorded onto a graph of its own
//! via `create_graph`, then differentiated again.

use approx::assert_relative_eq;
use gradix::{ops, Variable};

#[test]
fn second_derivative_of_sin() {
    // d/dx sin = cos, d2/dx2 sin = -sin; checked at pi/4.
    let x = Variable::scalar(std::f64::consts::FRAC_PI_4);
    let y = ops::sin(&x).unwrap();

    y.backward_with(false, true).unwrap();
    let gx = x.grad().unwrap();
    assert_relative_eq!(
        gx.item().unwrap(),
        (std::f64::consts::FRAC_PI_4).cos(),
        epsilon = 1e-12
    );

    x.clear_grad();
    gx.backward().unwrap();
    assert_relative_eq!(
        x.grad_value().unwrap().item().unwrap(),
        -(std::f64::consts::FRAC_PI_4).sin(),
        epsilon = 1e-12
    );
}

#[test]
fn second_derivative_of_polynomial() {
    // y = x^4 - 2x^2: y' = 4x^3 - 4x, y'' = 12x^2 - 4. At x=2: 24 and 44.
    let x = Variable::scalar(2.0);
    let y = ops::sub(
        &ops::pow(&x, 4.0).unwrap(),
        &ops::mul(&Variable::scalar(2.0), &ops::square(&x).unwrap()).unwrap(),
    )
    .unwrap();
    assert_eq!(y.item().unwrap(), 8.0);

    y.backward_with(false, true).unwrap();
    let gx = x.grad().unwrap();
    assert_eq!(gx.item().unwrap(), 24.0);

    x.clear_grad();
    gx.backward().unwrap();
    assert_eq!(x.grad_value().unwrap().item().unwrap(), 44.0);
}

#[test]
fn first_order_backward_leaves_no_graph_on_gradient() {
    // Without create_graph the gradient is a plain leaf and cannot be
    // differentiated further.
    let x = Variable::scalar(2.0);
    let y = ops::square(&x).unwrap();
    y.backward().unwrap();

    let gx = x.grad().unwrap();
    assert!(gx.creator().is_none());
    assert!(gx.backward().is_err());
}

#[test]
fn newton_step_on_quartic() {
    // One Newton iteration for y = x^4 - 2x^2 from x=2: x - y'/y'' = 2 - 24/44.
    let x = Variable::scalar(2.0);
    let y = ops::sub(
        &ops::pow(&x, 4.0).unwrap(),
        &ops::mul(&Variable::scalar(2.0), &ops::square(&x).unwrap()).unwrap(),
    )
    .unwrap();

    y.backward_with(false, true).unwrap();
    let gx = x.grad().unwrap();
    x.clear_grad();
    gx.backward().unwrap();
    let gx2 = x.grad().unwrap();

    let step = x.item().unwrap() - gx.item().unwrap() / gx2.item().unwrap();
    assert_relative_eq!(step, 2.0 - 24.0 / 44.0, epsilon = 1e-12);
}

#[test]
fn third_derivative() {
    // y = x^3: y' = 3x^2, y'' = 6x, y''' = 6. Chain create_graph twice.
    let x = Variable::scalar(5.0);
    let y = ops::pow(&x, 3.0).unwrap();

    y.backward_with(false, true).unwrap();
    let g1 = x.grad().unwrap();
    assert_eq!(g1.item().unwrap(), 75.0);

    x.clear_grad();
    g1.backward_with(false, true).unwrap();
    let g2 = x.grad().unwrap();
    assert_eq!(g2.item().unwrap(), 30.0);

    x.clear_grad();
    g2.backward().unwrap();
    assert_eq!(x.grad_value().unwrap().item().unwrap(), 6.0);
}
