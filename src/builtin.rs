//! # builtin
//!
//! ready made producers
//!

use std::ops::RangeInclusive;

use crate::error::BoxError;
use crate::producer::Producer;

/// counts through an inclusive range, one number per step
#[derive(Debug, Clone)]
pub struct Counter {
    next: Option<i64>,
    end: i64,
    stride: i64,
}

impl Counter {
    /// count every number in `range`
    pub fn new(range: RangeInclusive<i64>) -> Self {
        let (start, end) = range.into_inner();
        Counter {
            next: if start <= end { Some(start) } else { None },
            end,
            stride: 1,
        }
    }

    /// skip `stride - 1` numbers between two produced values
    ///
    /// a zero stride is treated as one
    pub fn stride(mut self, stride: u32) -> Self {
        self.stride = i64::from(stride.max(1));
        self
    }
}

impl Producer<i64> for Counter {
    fn resume(&mut self) -> Result<Option<i64>, BoxError> {
        let cur = match self.next {
            Some(v) => v,
            None => return Ok(None),
        };
        self.next = cur.checked_add(self.stride).filter(|v| *v <= self.end);
        Ok(Some(cur))
    }
}

/// bubble sort that stops after every swap
///
/// each step yields a snapshot of the data right after one swap, the
/// producer is exhausted once a full pass makes no swap
#[derive(Debug, Clone)]
pub struct BubbleSort<T> {
    data: Vec<T>,
    pass: usize,
    pos: usize,
    swapped: bool,
    done: bool,
}

impl<T: Ord + Clone> BubbleSort<T> {
    /// sort `data` in place, one swap per step
    pub fn new(data: Vec<T>) -> Self {
        let done = data.len() < 2;
        BubbleSort {
            data,
            pass: 0,
            pos: 0,
            swapped: false,
            done,
        }
    }

    /// the data in its current order
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T: Ord + Clone> Producer<Vec<T>> for BubbleSort<T> {
    fn resume(&mut self) -> Result<Option<Vec<T>>, BoxError> {
        while !self.done {
            // the tail of `pass` elements is already in place
            let limit = self.data.len() - 1 - self.pass;
            if self.pos >= limit {
                if !self.swapped {
                    self.done = true;
                    break;
                }
                self.pass += 1;
                self.pos = 0;
                self.swapped = false;
                continue;
            }

            let j = self.pos;
            self.pos += 1;
            if self.data[j] > self.data[j + 1] {
                self.data.swap(j, j + 1);
                self.swapped = true;
                return Ok(Some(self.data.clone()));
            }
        }
        Ok(None)
    }
}
