//! High-level KNX client wrapper.
//!
//! This module provides a typed, ergonomic API on top of
//! [`AsyncTunnelClient`] for common group-communication operations: writing
//! a value to a group address, requesting a read, and responding to one.
//! It is generic over [`AsyncTransport`] so the same code drives an Embassy
//! UDP socket on the microcontroller or a tokio socket in the daemon.

use crate::addressing::{GroupAddress, IndividualAddress};
use crate::dpt::{Dpt1, Dpt5, Dpt9, DptDecode, DptEncode, DptTag, DptValue};
use crate::net::transport::AsyncTransport;
use crate::protocol::cemi::{Apci, CEMIFrame, ControlField1, ControlField2};
use crate::protocol::constants::CEMIMessageCode;
use crate::protocol::tunnel_client::{AsyncTunnelClient, TunnelEvent};

pub use crate::error::{KnxError, Result};

/// Physical address this client presents on the bus when sending frames.
const DEVICE_ADDRESS_RAW: u16 = 0x1101; // 1.1.1

/// Maximum number of group address -> [`DptType`] registrations.
const REGISTRY_CAPACITY: usize = 32;

/// A typed KNX value, tagged by the datapoint type used to encode it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KnxValue {
    /// DPT 1.xxx - a single bit (switch, enable, up/down, ...).
    Bool(bool),
    /// DPT 5.001 - a percentage, 0-100.
    Percent(u8),
    /// DPT 9.001 - a temperature in degrees Celsius.
    Temperature(f32),
    /// DPT 9.007 - relative humidity, in percent.
    Humidity(f32),
    /// DPT 9.004 - illuminance, in lux.
    Lux(f32),
}

/// The datapoint type a group address is registered under.
///
/// Used to interpret the raw application data of an inbound `GroupValue_Write`
/// or `GroupValue_Response` telegram for addresses registered with
/// [`KnxClient::register_dpt`] (see [`crate::register_dpts`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DptType {
    /// DPT 1.001 - Switch.
    Bool,
    /// DPT 5.001 - Percentage.
    Percentage,
    /// DPT 9.001 - Temperature.
    Temperature,
    /// DPT 9.007 - Humidity.
    Humidity,
    /// DPT 9.004 - Illuminance (lux).
    Lux,
}

/// High-level KNX bus event, decoded from an inbound cEMI frame.
#[derive(Debug, Clone, Copy)]
pub enum KnxEvent {
    /// A `GroupValue_Write` telegram arrived for a registered address.
    GroupWrite {
        /// Destination group address.
        address: GroupAddress,
        /// Value, decoded per the address's registered [`DptType`].
        value: KnxValue,
    },
    /// A `GroupValue_Read` request arrived for a group address.
    GroupRead {
        /// Destination group address.
        address: GroupAddress,
    },
    /// A `GroupValue_Response` telegram arrived for a registered address.
    GroupResponse {
        /// Source group address.
        address: GroupAddress,
        /// Value, decoded per the address's registered [`DptType`].
        value: KnxValue,
    },
    /// A frame arrived for an address with no registered DPT, or whose
    /// payload did not match the registered DPT's expected length.
    Unknown {
        /// Destination group address.
        address: GroupAddress,
        /// Length of the raw application data.
        data_len: usize,
    },
}

/// High-level KNX client wrapper around an [`AsyncTunnelClient`].
pub struct KnxClient<T: AsyncTransport> {
    tunnel: AsyncTunnelClient<T>,
    registry: heapless::Vec<(GroupAddress, DptType), REGISTRY_CAPACITY>,
}

impl<T: AsyncTransport> KnxClient<T> {
    /// Wrap an already-constructed transport, targeting the given gateway.
    pub fn new(transport: T, gateway_ip: [u8; 4], gateway_port: u16) -> Self {
        Self {
            tunnel: AsyncTunnelClient::new(transport, gateway_ip, gateway_port),
            registry: heapless::Vec::new(),
        }
    }

    /// Connect to the KNX gateway.
    pub async fn connect(&mut self) -> Result<()> {
        self.tunnel.connect().await
    }

    /// Whether the connection is currently established.
    pub fn is_connected(&self) -> bool {
        self.tunnel.is_connected()
    }

    /// Send a CONNECTIONSTATE_REQUEST heartbeat and wait for the response.
    pub async fn heartbeat(&mut self) -> Result<()> {
        self.tunnel.heartbeat().await
    }

    /// Send DISCONNECT_REQUEST and tear the connection down.
    pub async fn disconnect(&mut self) -> Result<()> {
        self.tunnel.disconnect().await
    }

    /// Register the datapoint type a group address should be interpreted as
    /// on receive. Returns an error once [`REGISTRY_CAPACITY`] entries are
    /// registered.
    pub fn register_dpt(&mut self, address: GroupAddress, dpt: DptType) -> Result<()> {
        if let Some(slot) = self.registry.iter_mut().find(|(a, _)| *a == address) {
            slot.1 = dpt;
            return Ok(());
        }
        self.registry
            .push((address, dpt))
            .map_err(|_| KnxError::buffer_too_small())
    }

    fn lookup_dpt(&self, address: GroupAddress) -> Option<DptType> {
        self.registry
            .iter()
            .find(|(a, _)| *a == address)
            .map(|(_, dpt)| *dpt)
    }

    /// Write a value to a group address (`GroupValue_Write`).
    pub async fn write(&mut self, address: GroupAddress, value: KnxValue) -> Result<()> {
        let mut frame_buf = [0u8; LDataBuilder::MAX_SIZE];
        let n = self.build_group_frame(Apci::GroupValueWrite, address, Some(value), &mut frame_buf)?;
        self.tunnel.send_cemi(&frame_buf[..n]).await
    }

    /// Request the current value of a group address (`GroupValue_Read`).
    pub async fn read(&mut self, address: GroupAddress) -> Result<()> {
        let mut frame_buf = [0u8; LDataBuilder::MAX_SIZE];
        let n = self.build_group_frame(Apci::GroupValueRead, address, None, &mut frame_buf)?;
        self.tunnel.send_cemi(&frame_buf[..n]).await
    }

    /// Respond to a read request with a value (`GroupValue_Response`).
    pub async fn respond(&mut self, address: GroupAddress, value: KnxValue) -> Result<()> {
        let mut frame_buf = [0u8; LDataBuilder::MAX_SIZE];
        let n = self.build_group_frame(Apci::GroupValueResponse, address, Some(value), &mut frame_buf)?;
        self.tunnel.send_cemi(&frame_buf[..n]).await
    }

    /// Write a value to a group address under an arbitrary numeric DPT tag
    /// (`major*1000 + minor`, e.g. `DptTag::new(9, 1)` for `9.001`).
    ///
    /// This is the tag-generic counterpart to [`Self::write`]: it goes
    /// through [`crate::dpt::pack`] instead of the curated [`KnxValue`]
    /// enum, so it covers every DPT family the registry knows about rather
    /// than the handful [`KnxValue`] names.
    pub async fn write_dpt(&mut self, address: GroupAddress, tag: DptTag, value: DptValue) -> Result<()> {
        let mut frame_buf = [0u8; LDataBuilder::MAX_SIZE];
        let n = self.build_group_frame_dpt(Apci::GroupValueWrite, address, tag, &value, &mut frame_buf)?;
        self.tunnel.send_cemi(&frame_buf[..n]).await
    }

    /// Respond to a read request with a value under an arbitrary numeric
    /// DPT tag. See [`Self::write_dpt`].
    pub async fn respond_dpt(&mut self, address: GroupAddress, tag: DptTag, value: DptValue) -> Result<()> {
        let mut frame_buf = [0u8; LDataBuilder::MAX_SIZE];
        let n = self.build_group_frame_dpt(Apci::GroupValueResponse, address, tag, &value, &mut frame_buf)?;
        self.tunnel.send_cemi(&frame_buf[..n]).await
    }

    fn build_group_frame_dpt(
        &self,
        apci: Apci,
        address: GroupAddress,
        tag: DptTag,
        value: &DptValue,
        buf: &mut [u8],
    ) -> Result<usize> {
        let mut data_buf = [0u8; 8];
        let data_len = crate::dpt::pack(tag, value, &mut data_buf)?;
        if crate::dpt::dpt_is_short(tag)? {
            LDataBuilder::group_value_short(CEMIMessageCode::LDataReq, apci, address, data_buf[0], buf)
        } else {
            LDataBuilder::group_value_data(
                CEMIMessageCode::LDataReq,
                apci,
                address,
                &data_buf[..data_len],
                buf,
            )
        }
    }

    fn build_group_frame(
        &self,
        apci: Apci,
        address: GroupAddress,
        value: Option<KnxValue>,
        buf: &mut [u8],
    ) -> Result<usize> {
        match value {
            // DPT 1.xxx values are carried inline in the APCI byte's low bit,
            // not as a following application-data byte.
            Some(KnxValue::Bool(b)) => {
                LDataBuilder::group_value_bit(CEMIMessageCode::LDataReq, apci, address, b, buf)
            }
            Some(other) => {
                let mut data_buf = [0u8; 4];
                let data_len = encode_value(other, &mut data_buf)?;
                LDataBuilder::group_value_data(
                    CEMIMessageCode::LDataReq,
                    apci,
                    address,
                    &data_buf[..data_len],
                    buf,
                )
            }
            None => LDataBuilder::group_value_data(CEMIMessageCode::LDataReq, apci, address, &[], buf),
        }
    }

    /// Wait for and decode the next KNX bus event.
    ///
    /// Returns `Ok(None)` on a poll timeout (no frame arrived).
    pub async fn receive_event(&mut self, timeout_ms: u32) -> Result<Option<KnxEvent>> {
        let cemi_data = match self.tunnel.poll_receive(timeout_ms).await? {
            TunnelEvent::Cemi(data) => data,
            TunnelEvent::Idle => return Ok(None),
        };

        let Ok(cemi) = CEMIFrame::parse(cemi_data) else {
            return Ok(None);
        };
        let Ok(ldata) = cemi.as_ldata() else {
            return Ok(None);
        };
        let Some(address) = ldata.destination_group() else {
            return Ok(None);
        };

        if ldata.is_group_read() {
            return Ok(Some(KnxEvent::GroupRead { address }));
        }

        let is_write = ldata.is_group_write();
        let is_response = ldata.is_group_response();
        if !is_write && !is_response {
            return Ok(Some(KnxEvent::Unknown {
                address,
                data_len: ldata.data.len(),
            }));
        }

        let Some(dpt) = self.lookup_dpt(address) else {
            return Ok(Some(KnxEvent::Unknown {
                address,
                data_len: ldata.data.len(),
            }));
        };

        let Some(value) = decode_value(dpt, &ldata) else {
            return Ok(Some(KnxEvent::Unknown {
                address,
                data_len: ldata.data.len(),
            }));
        };

        Ok(Some(if is_write {
            KnxEvent::GroupWrite { address, value }
        } else {
            KnxEvent::GroupResponse { address, value }
        }))
    }
}

/// Encode a [`KnxValue`] to its wire bytes. Returns the byte count written.
fn encode_value(value: KnxValue, buf: &mut [u8]) -> Result<usize> {
    match value {
        KnxValue::Bool(b) => Dpt1::Switch.encode(b, buf),
        KnxValue::Percent(p) => Dpt5::Percentage.encode(u16::from(p), buf),
        KnxValue::Temperature(t) => Dpt9::Temperature.encode(t, buf),
        KnxValue::Humidity(h) => Dpt9::Humidity.encode(h, buf),
        KnxValue::Lux(l) => Dpt9::Illuminance.encode(l, buf),
    }
}

/// Decode an `L_Data` frame's application data against a registered DPT.
///
/// For single-bit DPTs the value is embedded in the low bits of the APCI
/// byte rather than carried as extra application data, so those still
/// decode correctly even though `ldata.data` is empty.
fn decode_value(dpt: DptType, ldata: &crate::protocol::cemi::LDataFrame<'_>) -> Option<KnxValue> {
    match dpt {
        DptType::Bool => {
            let bit = extract_inline_bit(ldata)?;
            Some(KnxValue::Bool(Dpt1::Switch.decode(&[bit]).ok()?))
        }
        DptType::Percentage => {
            let v = Dpt5::Percentage.decode(ldata.data).ok()?;
            Some(KnxValue::Percent(v as u8))
        }
        DptType::Temperature => Some(KnxValue::Temperature(Dpt9::Temperature.decode(ldata.data).ok()?)),
        DptType::Humidity => Some(KnxValue::Humidity(Dpt9::Humidity.decode(ldata.data).ok()?)),
        DptType::Lux => Some(KnxValue::Lux(Dpt9::Illuminance.decode(ldata.data).ok()?)),
    }
}

/// For 1-bit DPTs the value is carried inline in the low 6 bits of the
/// frame's raw APCI byte (see [`extract_6bit_value`](crate::protocol::cemi::extract_6bit_value))
/// rather than as a following application-data byte.
fn extract_inline_bit(ldata: &crate::protocol::cemi::LDataFrame<'_>) -> Option<u8> {
    if !ldata.data.is_empty() {
        return Some(ldata.data[0] & 0x01);
    }
    Some(crate::protocol::cemi::extract_6bit_value(ldata.apci_byte) & 0x01)
}

/// Builds `L_Data.req` cEMI frames for group communication.
struct LDataBuilder;

impl LDataBuilder {
    /// Message code + add-info-len + ctrl1 + ctrl2 + source(2) + dest(2) +
    /// npdu_len + tpci + apci + up to 4 data bytes.
    const MAX_SIZE: usize = 2 + 2 + 2 + 2 + 1 + 1 + 1 + 4;

    fn write_header(
        message_code: CEMIMessageCode,
        destination: GroupAddress,
        npdu_length: u8,
        buf: &mut [u8],
    ) {
        let source = IndividualAddress::from(DEVICE_ADDRESS_RAW);

        buf[0] = message_code.to_u8();
        buf[1] = 0x00; // additional info length

        buf[2] = ControlField1::default().raw();
        buf[3] = ControlField2::default().raw();

        let source_raw: u16 = source.into();
        buf[4..6].copy_from_slice(&source_raw.to_be_bytes());

        let dest_raw: u16 = destination.into();
        buf[6..8].copy_from_slice(&dest_raw.to_be_bytes());

        buf[8] = npdu_length;
        buf[9] = 0x00; // TPCI: unnumbered data, low 2 bits double as APCI bits 9-8
    }

    /// Build a group-addressed `L_Data` frame for a 1-bit value, embedded
    /// inline in the APCI byte's bit 0 (no separate application-data byte).
    fn group_value_bit(
        message_code: CEMIMessageCode,
        apci: Apci,
        destination: GroupAddress,
        bit: bool,
        buf: &mut [u8],
    ) -> Result<usize> {
        Self::group_value_short(message_code, apci, destination, u8::from(bit), buf)
    }

    /// Build a group-addressed `L_Data` frame for a short DPT (1/2/3.xxx,
    /// `is_short` in the registry), embedded inline in the low 6 bits of the
    /// APCI byte rather than as a following application-data byte.
    fn group_value_short(
        message_code: CEMIMessageCode,
        apci: Apci,
        destination: GroupAddress,
        value: u8,
        buf: &mut [u8],
    ) -> Result<usize> {
        if buf.len() < 11 {
            return Err(KnxError::buffer_too_small());
        }
        Self::write_header(message_code, destination, 2, buf);
        let apci_lo = (apci.to_u16() & 0xC0) as u8;
        buf[10] = apci_lo | (value & 0x3F);
        Ok(11)
    }

    /// Build a group-addressed `L_Data` frame carrying `data` as separate
    /// application-data bytes following the APCI byte (used for every DPT
    /// wider than 1 bit, and for a bare `GroupValue_Read` with no data).
    fn group_value_data(
        message_code: CEMIMessageCode,
        apci: Apci,
        destination: GroupAddress,
        data: &[u8],
        buf: &mut [u8],
    ) -> Result<usize> {
        if data.len() > 4 {
            return Err(KnxError::payload_too_large());
        }
        let needed = 11 + data.len();
        if buf.len() < needed {
            return Err(KnxError::buffer_too_small());
        }

        let npdu_length = (2 + data.len()) as u8;
        Self::write_header(message_code, destination, npdu_length, buf);
        let apci_lo = (apci.to_u16() & 0xC0) as u8;
        buf[10] = apci_lo;
        buf[11..11 + data.len()].copy_from_slice(data);
        Ok(11 + data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::mock_transport::MockTransport;
    use crate::protocol::cemi::LDataFrame;

    fn connect_response(channel_id: u8) -> Vec<u8> {
        let mut body = vec![
            0x06, 0x10, 0x02, 0x06, 0x00, 0x14, channel_id, 0x00, 0x08, 0x01, 192, 168, 1, 10,
            0x0E, 0x57, 0x04, 0x04, 0x02, 0x00,
        ];
        let len = body.len() as u16;
        body[4..6].copy_from_slice(&len.to_be_bytes());
        body
    }

    #[test]
    fn group_write_bool_embeds_bit_in_apci_byte() {
        let mut buf = [0u8; LDataBuilder::MAX_SIZE];
        let address = GroupAddress::new(1, 2, 3).unwrap();

        let len = LDataBuilder::group_value_bit(
            CEMIMessageCode::LDataReq,
            Apci::GroupValueWrite,
            address,
            true,
            &mut buf,
        )
        .unwrap();

        assert_eq!(len, 11);
        let ldata = LDataFrame::parse(&buf[2..len]).unwrap();
        assert!(ldata.is_group_write());
        assert_eq!(ldata.destination_group().unwrap(), address);
        assert!(ldata.data.is_empty());
        assert_eq!(extract_inline_bit(&ldata), Some(1));
    }

    #[test]
    fn group_write_temperature_appends_data_bytes() {
        let mut buf = [0u8; LDataBuilder::MAX_SIZE];
        let address = GroupAddress::new(1, 2, 10).unwrap();
        let mut data = [0u8; 2];
        let n = encode_value(KnxValue::Temperature(21.5), &mut data).unwrap();

        let len = LDataBuilder::group_value_data(
            CEMIMessageCode::LDataReq,
            Apci::GroupValueWrite,
            address,
            &data[..n],
            &mut buf,
        )
        .unwrap();

        let ldata = LDataFrame::parse(&buf[2..len]).unwrap();
        assert!(ldata.is_group_write());
        assert_eq!(ldata.data.len(), 2);
        let decoded = Dpt9::Temperature.decode(ldata.data).unwrap();
        assert!((decoded - 21.5).abs() < 0.1);
    }

    #[test]
    fn group_read_has_no_data() {
        let mut buf = [0u8; LDataBuilder::MAX_SIZE];
        let address = GroupAddress::new(5, 6, 7).unwrap();

        let len = LDataBuilder::group_value_data(
            CEMIMessageCode::LDataReq,
            Apci::GroupValueRead,
            address,
            &[],
            &mut buf,
        )
        .unwrap();

        let ldata = LDataFrame::parse(&buf[2..len]).unwrap();
        assert!(ldata.is_group_read());
    }

    #[test]
    fn register_dpt_updates_existing_entry() {
        let mock = MockTransport::new();
        let mut client = KnxClient::new(mock, [192, 168, 1, 10], 3671);
        let address = GroupAddress::new(1, 2, 3).unwrap();

        client.register_dpt(address, DptType::Bool).unwrap();
        client.register_dpt(address, DptType::Percentage).unwrap();

        assert_eq!(client.lookup_dpt(address), Some(DptType::Percentage));
        assert_eq!(client.registry.len(), 1);
    }

    #[test]
    fn register_dpt_rejects_beyond_capacity() {
        let mock = MockTransport::new();
        let mut client = KnxClient::new(mock, [192, 168, 1, 10], 3671);

        for sub in 0..REGISTRY_CAPACITY as u8 {
            let address = GroupAddress::new(1, 2, sub).unwrap();
            client.register_dpt(address, DptType::Bool).unwrap();
        }

        let overflow_address = GroupAddress::new(1, 3, 0).unwrap();
        assert!(client.register_dpt(overflow_address, DptType::Bool).is_err());
    }

    #[test]
    fn build_group_frame_dpt_short_embeds_in_apci() {
        let mock = MockTransport::new();
        let client = KnxClient::new(mock, [192, 168, 1, 10], 3671);
        let address = GroupAddress::new(1, 1, 7).unwrap();

        let mut buf = [0u8; LDataBuilder::MAX_SIZE];
        let tag = DptTag::new(1, 1);
        let n = client
            .build_group_frame_dpt(Apci::GroupValueWrite, address, tag, &DptValue::Bool(true), &mut buf)
            .unwrap();

        assert_eq!(n, 11);
        let ldata = LDataFrame::parse(&buf[2..n]).unwrap();
        assert!(ldata.data.is_empty());
        assert_eq!(extract_inline_bit(&ldata), Some(1));
    }

    #[test]
    fn build_group_frame_dpt_percent_appends_data() {
        let mock = MockTransport::new();
        let client = KnxClient::new(mock, [192, 168, 1, 10], 3671);
        let address = GroupAddress::new(1, 1, 7).unwrap();

        let mut buf = [0u8; LDataBuilder::MAX_SIZE];
        let tag = DptTag::new(5, 1);
        let n = client
            .build_group_frame_dpt(Apci::GroupValueWrite, address, tag, &DptValue::U16(50), &mut buf)
            .unwrap();

        let ldata = LDataFrame::parse(&buf[2..n]).unwrap();
        assert_eq!(ldata.data, &[0x80]);
    }

    #[test]
    fn build_group_frame_dpt_rejects_wrong_value_shape() {
        let mock = MockTransport::new();
        let client = KnxClient::new(mock, [192, 168, 1, 10], 3671);
        let address = GroupAddress::new(1, 1, 7).unwrap();
        let mut buf = [0u8; LDataBuilder::MAX_SIZE];

        let result = client.build_group_frame_dpt(
            Apci::GroupValueWrite,
            address,
            DptTag::new(1, 1),
            &DptValue::U16(5),
            &mut buf,
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn write_dpt_sends_tunneling_request_after_connect() {
        let mut mock = MockTransport::new();
        mock.add_response(connect_response(1));

        let mut client = KnxClient::new(mock, [192, 168, 1, 10], 3671);
        client.connect().await.unwrap();

        let address = GroupAddress::new(1, 2, 3).unwrap();
        let _ = client.write_dpt(address, DptTag::new(1, 1), DptValue::Bool(true)).await;
    }

    #[tokio::test]
    async fn write_sends_tunneling_request_after_connect() {
        let mut mock = MockTransport::new();
        mock.add_response(connect_response(1));

        let mut client = KnxClient::new(mock, [192, 168, 1, 10], 3671);
        client.connect().await.unwrap();

        // No further mocked response means the single send attempt times out
        // and is retried once before surfacing an ack-timeout error; what
        // matters here is that a well-formed TUNNELING_REQUEST went out.
        let address = GroupAddress::new(1, 2, 3).unwrap();
        let _ = client.write(address, KnxValue::Bool(true)).await;
    }
}
