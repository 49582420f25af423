//! Python bindings for the packed event codec with numpy support.
//!
//! Decoded fields come back as separate numpy arrays (x, y, polarity, t).

use evarr_core::buffer::{MonoIter, TriggerIter};
use evarr_core::{mono, BYTES_PER_EVENT};
use numpy::{IntoPyArray, PyArray1};
use pyo3::buffer::PyBuffer;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyDict};

/// Container for decoded mono events.
#[pyclass]
pub struct Events {
    /// Column coordinates
    x: Vec<u16>,
    /// Row coordinates
    y: Vec<u16>,
    /// Polarities (0 = OFF, 1 = ON)
    polarity: Vec<u8>,
    /// Absolute times
    t: Vec<u64>,
}

#[pymethods]
impl Events {
    /// Returns the number of events.
    fn __len__(&self) -> usize {
        self.x.len()
    }

    /// Returns a string representation.
    fn __repr__(&self) -> String {
        format!("Events(count={})", self.x.len())
    }

    /// Returns the X coordinates as a numpy array.
    #[getter]
    fn x<'py>(&self, py: Python<'py>) -> &'py PyArray1<u16> {
        self.x.clone().into_pyarray(py)
    }

    /// Returns the Y coordinates as a numpy array.
    #[getter]
    fn y<'py>(&self, py: Python<'py>) -> &'py PyArray1<u16> {
        self.y.clone().into_pyarray(py)
    }

    /// Returns the polarities as a numpy array.
    ///
    /// Values: 0 = OFF (decrease in brightness), 1 = ON (increase)
    #[getter]
    fn polarity<'py>(&self, py: Python<'py>) -> &'py PyArray1<u8> {
        self.polarity.clone().into_pyarray(py)
    }

    /// Alias for polarity (shorter name).
    #[getter]
    fn p<'py>(&self, py: Python<'py>) -> &'py PyArray1<u8> {
        self.polarity.clone().into_pyarray(py)
    }

    /// Returns the absolute times as a numpy array.
    #[getter]
    fn t<'py>(&self, py: Python<'py>) -> &'py PyArray1<u64> {
        self.t.clone().into_pyarray(py)
    }

    /// Returns all arrays as a dictionary.
    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<PyObject> {
        let dict = PyDict::new(py);
        dict.set_item("x", self.x.clone().into_pyarray(py))?;
        dict.set_item("y", self.y.clone().into_pyarray(py))?;
        dict.set_item("polarity", self.polarity.clone().into_pyarray(py))?;
        dict.set_item("t", self.t.clone().into_pyarray(py))?;
        Ok(dict.into())
    }
}

impl Events {
    fn from_mono_iter(iter: MonoIter<'_>) -> Self {
        let len = iter.len();
        let mut x = Vec::with_capacity(len);
        let mut y = Vec::with_capacity(len);
        let mut polarity = Vec::with_capacity(len);
        let mut t = Vec::with_capacity(len);

        for event in iter {
            x.push(event.x);
            y.push(event.y);
            polarity.push(event.polarity as u8);
            t.push(event.t);
        }

        Self { x, y, polarity, t }
    }
}

/// Container for decoded trigger events.
#[pyclass]
pub struct TriggerEvents {
    /// Edge polarities (0 = falling, 1 = rising)
    polarity: Vec<u8>,
    /// Absolute times
    t: Vec<u64>,
}

#[pymethods]
impl TriggerEvents {
    /// Returns the number of trigger events.
    fn __len__(&self) -> usize {
        self.t.len()
    }

    fn __repr__(&self) -> String {
        format!("TriggerEvents(count={})", self.t.len())
    }

    /// Returns the edge polarities as a numpy array.
    #[getter]
    fn polarity<'py>(&self, py: Python<'py>) -> &'py PyArray1<u8> {
        self.polarity.clone().into_pyarray(py)
    }

    /// Returns the absolute times as a numpy array.
    #[getter]
    fn t<'py>(&self, py: Python<'py>) -> &'py PyArray1<u64> {
        self.t.clone().into_pyarray(py)
    }
}

impl TriggerEvents {
    fn from_trigger_iter(iter: TriggerIter<'_>) -> Self {
        let (polarity, t) = iter.map(|event| (event.polarity as u8, event.t)).unzip();
        Self { polarity, t }
    }
}

/// Decodes a buffer of packed mono events.
///
/// Args:
///     data: Packed little-endian 64-bit event words, as any byte buffer
///         (bytes, bytearray, array.array('B'), numpy uint8 array)
///     time_base: Time base added to every event's time delta
///
/// Returns:
///     Events: Container with x, y, polarity, and t arrays
///
/// Example:
///     >>> import evarr
///     >>> events = evarr.decode_mono(msg.events, msg.time_base)
///     >>> x = events.x  # numpy array of x coordinates
#[pyfunction]
#[pyo3(signature = (data, time_base=0))]
fn decode_mono(py: Python<'_>, data: PyBuffer<u8>, time_base: u64) -> PyResult<Py<Events>> {
    let bytes = data.to_vec(py)?;
    let iter = MonoIter::new(&bytes, time_base)
        .map_err(|e| PyValueError::new_err(format!("Failed to decode events: {}", e)))?;
    Py::new(py, Events::from_mono_iter(iter))
}

/// Decodes a buffer of packed trigger events.
///
/// Args:
///     data: Packed little-endian 64-bit event words, as any byte buffer
///         (bytes, bytearray, array.array('B'), numpy uint8 array)
///     time_base: Time base added to every event's time delta
///
/// Returns:
///     TriggerEvents: Container with polarity and t arrays
#[pyfunction]
#[pyo3(signature = (data, time_base=0))]
fn decode_trigger(
    py: Python<'_>,
    data: PyBuffer<u8>,
    time_base: u64,
) -> PyResult<Py<TriggerEvents>> {
    let bytes = data.to_vec(py)?;
    let iter = TriggerIter::new(&bytes, time_base)
        .map_err(|e| PyValueError::new_err(format!("Failed to decode events: {}", e)))?;
    Py::new(py, TriggerEvents::from_trigger_iter(iter))
}

/// Packs mono events into little-endian 64-bit words.
///
/// All four sequences must have the same length. Each `dt` is the time
/// relative to the time base the consumer will use.
///
/// Returns:
///     bytes: N * 8 bytes of packed events
#[pyfunction]
fn encode_mono<'py>(
    py: Python<'py>,
    polarity: Vec<bool>,
    x: Vec<u16>,
    y: Vec<u16>,
    dt: Vec<u32>,
) -> PyResult<&'py PyBytes> {
    let len = polarity.len();
    if x.len() != len || y.len() != len || dt.len() != len {
        return Err(PyValueError::new_err(
            "polarity, x, y and dt must have the same length",
        ));
    }

    let mut out = Vec::with_capacity(len * BYTES_PER_EVENT);
    let fields = polarity.iter().zip(&x).zip(&y).zip(&dt);
    for (i, (((&p, &x), &y), &dt)) in fields.enumerate() {
        let word = mono::try_encode(p, x, y, dt)
            .map_err(|e| PyValueError::new_err(format!("Event {}: {}", i, e)))?;
        out.extend_from_slice(&word.to_le_bytes());
    }
    Ok(PyBytes::new(py, &out))
}

/// Packed event codec module for Python.
#[pymodule]
fn evarr(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(decode_mono, m)?)?;
    m.add_function(wrap_pyfunction!(decode_trigger, m)?)?;
    m.add_function(wrap_pyfunction!(encode_mono, m)?)?;
    m.add_class::<Events>()?;
    m.add_class::<TriggerEvents>()?;
    m.add("BYTES_PER_EVENT", BYTES_PER_EVENT)?;
    Ok(())
}
