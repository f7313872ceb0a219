//! # producer
//!
//! the value-production side of a step generator
//!
//! a producer keeps its own cursor and does exactly one unit of work per
//! `resume`, so no stack switching is needed to suspend it between steps
//!

use std::fmt;

use crate::error::BoxError;

/// produce the next value or signal exhaustion
pub trait Producer<T> {
    /// run until the next value is known
    ///
    /// `Ok(Some(v))` is a produced value, `Ok(None)` means exhausted and
    /// `Err(e)` is a producer fault. The generator never calls `resume`
    /// again after it returned `Ok(None)` or `Err(_)`.
    fn resume(&mut self) -> Result<Option<T>, BoxError>;
}

impl<T, P: Producer<T> + ?Sized> Producer<T> for Box<P> {
    #[inline]
    fn resume(&mut self) -> Result<Option<T>, BoxError> {
        (**self).resume()
    }
}

/// producer created by [`from_fn`]
#[derive(Clone)]
pub struct FromFn<F>(F);

impl<T, F> Producer<T> for FromFn<F>
where
    F: FnMut() -> Option<T>,
{
    #[inline]
    fn resume(&mut self) -> Result<Option<T>, BoxError> {
        Ok((self.0)())
    }
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FromFn { .. }")
    }
}

/// create an infallible producer from a closure
///
/// the closure captures its own progress and returns `None` once exhausted
pub fn from_fn<T, F>(f: F) -> FromFn<F>
where
    F: FnMut() -> Option<T>,
{
    FromFn(f)
}

/// producer created by [`try_from_fn`]
#[derive(Clone)]
pub struct TryFromFn<F>(F);

impl<T, F> Producer<T> for TryFromFn<F>
where
    F: FnMut() -> Result<Option<T>, BoxError>,
{
    #[inline]
    fn resume(&mut self) -> Result<Option<T>, BoxError> {
        (self.0)()
    }
}

impl<F> fmt::Debug for TryFromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TryFromFn { .. }")
    }
}

/// create a fallible producer from a closure
///
/// the [`yield_!`](crate::yield_) and [`done!`](crate::done) macros are
/// shorthand for the two successful returns
pub fn try_from_fn<T, F>(f: F) -> TryFromFn<F>
where
    F: FnMut() -> Result<Option<T>, BoxError>,
{
    TryFromFn(f)
}

/// producer created by [`from_iter`]
#[derive(Debug, Clone)]
pub struct FromIter<I>(I);

impl<I: Iterator> Producer<I::Item> for FromIter<I> {
    #[inline]
    fn resume(&mut self) -> Result<Option<I::Item>, BoxError> {
        Ok(self.0.next())
    }
}

/// drive any iterator as a producer, one item per step
pub fn from_iter<I: IntoIterator>(iter: I) -> FromIter<I::IntoIter> {
    FromIter(iter.into_iter())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_fn_cursor() {
        let mut i = 0;
        let mut p = from_fn(move || {
            i += 1;
            if i <= 2 {
                Some(i)
            } else {
                None
            }
        });
        assert_eq!(p.resume().unwrap(), Some(1));
        assert_eq!(p.resume().unwrap(), Some(2));
        assert_eq!(p.resume().unwrap(), None);
    }

    #[test]
    fn test_try_from_fn_fault() {
        let mut p = try_from_fn::<u8, _>(|| Err("broken".into()));
        let err = p.resume().unwrap_err();
        assert_eq!(err.to_string(), "broken");
    }

    #[test]
    fn test_boxed() {
        let mut p: Box<dyn Producer<char>> = Box::new(from_iter("ab".chars()));
        assert_eq!(p.resume().unwrap(), Some('a'));
        assert_eq!(p.resume().unwrap(), Some('b'));
        assert_eq!(p.resume().unwrap(), None);
    }
}
