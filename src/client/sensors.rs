// src/client/sensors.rs

use super::{ClientContext, UniClient};
use crate::common::{
    hal_traits::{BusInstant, BusTimer, NonVolatileStorage, OneWireBus},
    host::HostFramework,
    line::LineId,
    packet::{Packet, SLOT_DATA_SIZE},
    types::{Humidity, Reading, SensorCategory, StateKind, Temperature, NO_LUMINOSITY_DATA},
};
use core::time::Duration;
use log::{debug, trace, warn};

/// Client for modules carrying up to three plain sensors.
#[derive(Debug)]
pub struct SensorsClient<I> {
    line: Option<LineId>,
    last_trigger: Option<I>,
    measurement_cooldown: Duration,
}

impl<I: BusInstant> SensorsClient<I> {
    pub fn new(measurement_cooldown: Duration) -> Self {
        SensorsClient {
            line: None,
            last_trigger: None,
            measurement_cooldown,
        }
    }

    /// Line the client is currently bound to.
    pub fn line(&self) -> Option<LineId> {
        self.line
    }

    /// Time of the last start-measurement command, if any was issued.
    pub fn last_trigger(&self) -> Option<I> {
        self.last_trigger
    }

    /// Issues a start-measurement on the bound line unless one went out within
    /// the cooldown. The cooldown is shared by all lines.
    fn rearm_measurement<IF, H, S>(&mut self, ctx: &mut ClientContext<'_, IF, H, S>)
    where
        IF: OneWireBus + BusTimer<Instant = I>,
        H: HostFramework,
    {
        let now = ctx.transport.now();
        let due = match self.last_trigger {
            None => true,
            Some(last) => now - last > self.measurement_cooldown,
        };
        if !due {
            return;
        }
        self.last_trigger = Some(now);

        let Some(line) = self.line else { return };
        match ctx.transport.trigger_measurement(line) {
            Ok(()) => trace!("{}: measurement started", line),
            Err(e) => trace!("{}: start measurement failed: {:?}", line, e),
        }
    }
}

impl<I: BusInstant> UniClient<I> for SensorsClient<I> {
    fn bind(&mut self, line: LineId) {
        self.line = Some(line);
    }

    fn register<IF, H, S>(&mut self, ctx: &mut ClientContext<'_, IF, H, S>, packet: &Packet)
    where
        IF: OneWireBus + BusTimer<Instant = I>,
        H: HostFramework,
        S: NonVolatileStorage,
    {
        let mut grown = false;
        for (category, relative_index, _) in packet.assigned_slots() {
            match ctx.registry.reserve(ctx.host, category, relative_index) {
                Ok(_) => grown = true,
                Err(e) => debug!("{} sensor {}: {}", category, relative_index, e),
            }
        }

        if grown {
            if let Err(e) = ctx.registry.save(ctx.storage) {
                warn!("failed to persist sensor counters: {:?}", e);
            }
        }
    }

    fn update<IF, H, S>(
        &mut self,
        ctx: &mut ClientContext<'_, IF, H, S>,
        packet: &Packet,
        is_online: bool,
    ) where
        IF: OneWireBus + BusTimer<Instant = I>,
        H: HostFramework,
        S: NonVolatileStorage,
    {
        for (category, relative_index, slot) in packet.assigned_slots() {
            let Some(states) = ctx.registry.lookup(ctx.host, category, relative_index) else {
                continue;
            };
            for (kind, state) in states {
                if let Some(reading) = decode_reading(kind, category, &slot.raw_data, is_online) {
                    if is_online && !reading.has_data() {
                        trace!("{} sensor {}: no reading yet", category, relative_index);
                    }
                    ctx.host.push_reading(state, reading);
                }
            }
        }

        self.rearm_measurement(ctx);
    }
}

/// Turns a slot's raw bytes into the reading for one state of `kind`.
///
/// Offline modules yield the "no data" value of the kind. Kinds this client
/// does not handle yield `None`.
pub fn decode_reading(
    kind: StateKind,
    category: SensorCategory,
    raw: &[u8; SLOT_DATA_SIZE],
    is_online: bool,
) -> Option<Reading> {
    match kind {
        StateKind::Temperature => {
            if !is_online {
                return Some(Reading::Temperature(Temperature::NO_DATA));
            }
            // Humidity modules put temperature after the humidity value.
            let at = if category == SensorCategory::Humidity {
                2
            } else {
                0
            };
            let temperature = Temperature::new(raw[at] as i8, raw[at + 1]);
            Some(Reading::Temperature(temperature))
        }
        StateKind::Humidity | StateKind::SoilMoisture => {
            if !is_online {
                return Some(Reading::Humidity(Humidity::NO_DATA));
            }
            Some(Reading::Humidity(Humidity::new(raw[0] as i8, raw[1])))
        }
        StateKind::Luminosity => {
            let lux = if is_online {
                u32::from_le_bytes(*raw)
            } else {
                NO_LUMINOSITY_DATA
            };
            Some(Reading::Luminosity(lux))
        }
        StateKind::WaterFlowInstant
        | StateKind::WaterFlowIncremental
        | StateKind::PH
        | StateKind::Unknown => None,
    }
}
