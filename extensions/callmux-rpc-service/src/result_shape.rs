use callmux::error::DecodeFault;
use std::convert::Infallible;
use std::marker::PhantomData;

/// How a method's declared result is carried by chunk envelopes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResultCategory {
    /// The method never produces a value; only errors and stream end matter.
    NoValue,
    /// Chunk payloads are handed to the caller verbatim.
    RawBytes,
    /// Each chunk payload is one `bitcode`-encoded value (or tuple of values).
    Value,
}

pub type UnpackFn<T> = fn(&[u8]) -> Result<T, DecodeFault>;

/// The decoding routine selected for one result shape.
///
/// Resolved once per method from its `ResultShape`; handlers keep it as a
/// plain function pointer, so no type inspection happens per chunk.
pub struct Unpacker<T> {
    category: ResultCategory,
    unpack: Option<UnpackFn<T>>,
}

impl<T> Clone for Unpacker<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Unpacker<T> {}

impl<T> Unpacker<T> {
    pub fn category(&self) -> ResultCategory {
        self.category
    }

    /// Decodes one chunk payload.
    ///
    /// Returns `None` for shapes that carry no value, without looking at the
    /// payload.
    pub fn unpack(&self, payload: &[u8]) -> Option<Result<T, DecodeFault>> {
        self.unpack.map(|unpack| unpack(payload))
    }
}

/// Type-level description of a method's result.
///
/// Implemented by the three marker types `NoValue`, `RawBytes` and
/// `Value<T>`; an `RpcEvent` names one of them as its `Result`.
pub trait ResultShape: 'static {
    /// What the caller's result stream yields.
    type Item: Send + 'static;

    const CATEGORY: ResultCategory;

    fn unpacker() -> Unpacker<Self::Item>;
}

pub struct NoValue;

impl ResultShape for NoValue {
    type Item = Infallible;

    const CATEGORY: ResultCategory = ResultCategory::NoValue;

    fn unpacker() -> Unpacker<Self::Item> {
        Unpacker {
            category: Self::CATEGORY,
            unpack: None,
        }
    }
}

pub struct RawBytes;

impl ResultShape for RawBytes {
    type Item = Vec<u8>;

    const CATEGORY: ResultCategory = ResultCategory::RawBytes;

    fn unpacker() -> Unpacker<Self::Item> {
        Unpacker {
            category: Self::CATEGORY,
            unpack: Some(unpack_raw),
        }
    }
}

/// A result decoded with `bitcode`; use a tuple for multi-field results.
pub struct Value<T>(PhantomData<fn() -> T>);

impl<T> ResultShape for Value<T>
where
    T: bitcode::DecodeOwned + Send + 'static,
{
    type Item = T;

    const CATEGORY: ResultCategory = ResultCategory::Value;

    fn unpacker() -> Unpacker<Self::Item> {
        Unpacker {
            category: Self::CATEGORY,
            unpack: Some(unpack_value::<T>),
        }
    }
}

fn unpack_raw(payload: &[u8]) -> Result<Vec<u8>, DecodeFault> {
    Ok(payload.to_vec())
}

fn unpack_value<T>(payload: &[u8]) -> Result<T, DecodeFault>
where
    T: bitcode::DecodeOwned,
{
    bitcode::decode::<T>(payload)
        .map_err(|e| DecodeFault::new(std::any::type_name::<T>(), e.to_string()))
}
