//! Broadcasting forward semantics and the reduce-to-shape gradient duals.

use gradix::{ops, Tensor, Variable};

#[test]
fn broadcast_add_reduces_gradient_over_broadcast_axis() {
    // x0 = [1,2,3], x1 = [10]; y = x0 + x1 = [11,12,13]
    // dy/dx1 = [3] (summed over the broadcast axis), dy/dx0 = [1,1,1]
    let x0 = Variable::from_vec(vec![1.0, 2.0, 3.0]);
    let x1 = Variable::from_vec(vec![10.0]);
    let y = ops::add(&x0, &x1).unwrap();
    assert_eq!(y.value().to_vec(), vec![11.0, 12.0, 13.0]);

    y.backward().unwrap();
    assert_eq!(x0.grad_value().unwrap().to_vec(), vec![1.0, 1.0, 1.0]);
    let g1 = x1.grad_value().unwrap();
    assert_eq!(g1.shape(), &[1]);
    assert_eq!(g1.to_vec(), vec![3.0]);
}

#[test]
fn broadcast_across_new_leading_axis() {
    let x = Variable::new(Tensor::new(vec![1.0; 6], vec![2, 3]).unwrap());
    let row = Variable::from_vec(vec![1.0, 2.0, 3.0]);
    let y = ops::mul(&x, &row).unwrap();
    assert_eq!(y.shape(), vec![2, 3]);

    y.backward().unwrap();
    // The row's gradient sums over the introduced leading axis.
    assert_eq!(row.grad_value().unwrap().shape(), &[3]);
    assert_eq!(row.grad_value().unwrap().to_vec(), vec![2.0, 2.0, 2.0]);
    assert_eq!(
        x.grad_value().unwrap().to_vec(),
        vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0]
    );
}

#[test]
fn shape_duals_are_identity_when_shapes_match() {
    let x = Variable::from_vec(vec![1.0, 2.0, 3.0]);

    let same = ops::broadcast_to(&x, &[3]).unwrap();
    assert!(same.ptr_eq(&x));
    assert!(same.creator().is_none(), "identity must not be recorded");

    let same = ops::sum_to(&x, &[3]).unwrap();
    assert!(same.ptr_eq(&x));
    assert!(same.creator().is_none(), "identity must not be recorded");
}

#[test]
fn duals_roundtrip_through_backward() {
    // broadcast_to then sum_to is differentiable end to end.
    let x = Variable::from_vec(vec![1.0, 2.0, 3.0]);
    let expanded = ops::broadcast_to(&x, &[4, 3]).unwrap();
    let y = ops::sum_to(&expanded, &[3]).unwrap();
    assert_eq!(y.value().to_vec(), vec![4.0, 8.0, 12.0]);

    y.backward().unwrap();
    assert_eq!(x.grad_value().unwrap().to_vec(), vec![4.0, 4.0, 4.0]);
}

#[test]
fn scalar_broadcasts_against_matrix() {
    let x = Variable::new(Tensor::new(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap());
    let c = Variable::scalar(10.0);
    let y = ops::mul(&x, &c).unwrap();
    assert_eq!(y.value().to_vec(), vec![10.0, 20.0, 30.0, 40.0]);

    y.backward().unwrap();
    assert_eq!(x.grad_value().unwrap().to_vec(), vec![10.0; 4]);
    let gc = c.grad_value().unwrap();
    assert_eq!(gc.shape(), &[] as &[usize]);
    assert_eq!(gc.item().unwrap(), 10.0);
}

#[test]
fn sum_then_broadcast_gradients() {
    // Mean-like pipeline: reduce, then compare against a scalar target.
    let x = Variable::new(Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap());
    let total = ops::sum(&x, Some(&[0]), false).unwrap();
    assert_eq!(total.value().to_vec(), vec![5.0, 7.0, 9.0]);

    total.backward().unwrap();
    assert_eq!(x.grad_value().unwrap().to_vec(), vec![1.0; 6]);
}
