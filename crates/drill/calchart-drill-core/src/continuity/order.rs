use serde::{Deserialize, Serialize};

use crate::ids::DotId;

/// Explicit ordering of dots for continuities like counter marches and
/// two-steps. The order is only ever changed by the user, never derived from
/// positions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DotOrder(Vec<DotId>);

impl DotOrder {
    pub fn new(order: Vec<DotId>) -> Self {
        Self(order)
    }

    pub fn get_order(&self) -> &[DotId] {
        &self.0
    }

    pub fn set_order(&mut self, order: Vec<DotId>) {
        self.0 = order;
    }

    pub fn reverse_order(&mut self) {
        self.0.reverse();
    }

    pub fn index_of(&self, dot: &DotId) -> Option<usize> {
        self.0.iter().position(|d| d == dot)
    }

    /// Index of `dot`, appending it first if it is not in the order yet.
    pub fn ensure_member(&mut self, dot: &DotId) -> usize {
        match self.index_of(dot) {
            Some(i) => i,
            None => {
                self.0.push(dot.clone());
                self.0.len() - 1
            }
        }
    }

    /// Place of `dot` in line; dots outside the order come last.
    pub fn slot_of(&self, dot: &DotId) -> usize {
        self.index_of(dot).unwrap_or(self.0.len())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<DotId>> for DotOrder {
    fn from(order: Vec<DotId>) -> Self {
        Self(order)
    }
}

/// Continuities that keep a [`DotOrder`].
pub trait OrderedDots {
    fn order(&self) -> &DotOrder;
    fn order_mut(&mut self) -> &mut DotOrder;

    fn get_order(&self) -> &[DotId] {
        self.order().get_order()
    }

    fn set_order(&mut self, order: Vec<DotId>) {
        self.order_mut().set_order(order);
    }

    fn reverse_order(&mut self) {
        self.order_mut().reverse_order();
    }

    fn index_of(&self, dot: &DotId) -> Option<usize> {
        self.order().index_of(dot)
    }
}
