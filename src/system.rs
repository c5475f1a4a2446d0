// src/system.rs

use crate::client::{ClientContext, ClientFactory, ClientKind};
use crate::common::{
    config::UniConfig,
    error::UniError,
    hal_traits::{BusTimer, NonVolatileStorage, OneWireBus},
    host::{ControllerSettings, HostFramework},
    line::LineId,
    packet::Packet,
    types::SensorCategory,
};
use crate::registry::IndexRegistry;
use crate::transport::SyncTransport;
use log::{info, warn};

/// Everything the bus lines share: the transport, the index registry, the
/// client instances, the host framework and controller storage.
///
/// Created once at startup by [`UniSystem::setup`] and passed by `&mut` to
/// every line operation.
pub struct UniSystem<IF, H, S>
where
    IF: OneWireBus + BusTimer,
    H: HostFramework + ControllerSettings,
    S: NonVolatileStorage,
{
    transport: SyncTransport<IF>,
    registry: IndexRegistry<H::Module>,
    clients: ClientFactory<IF::Instant>,
    host: H,
    storage: S,
    config: UniConfig,
}

impl<IF, H, S> UniSystem<IF, H, S>
where
    IF: OneWireBus + BusTimer,
    H: HostFramework + ControllerSettings,
    S: NonVolatileStorage,
{
    /// Binds the registry to the host's modules, loads the persisted counters
    /// and re-creates the states of every previously registered sensor.
    ///
    /// Call after the firmware has created its own hardcoded states. A storage
    /// read error is logged and leaves the counters at zero.
    pub fn setup(bus: IF, mut host: H, mut storage: S, config: UniConfig) -> Self {
        let offset = config.storage_offset;
        let mut registry = IndexRegistry::bind(&host).with_storage_offset(offset);
        if let Err(e) = registry.load(&mut storage) {
            warn!("failed to load sensor counters, starting empty: {:?}", e);
        }
        registry.replay_on_boot(&mut host);

        let counters = registry.counters();
        info!(
            "universal sensors ready: controller {}, virtual sensors {}/{}/{}/{}",
            host.controller_id(),
            counters[SensorCategory::Temperature.slot()],
            counters[SensorCategory::Humidity.slot()],
            counters[SensorCategory::Luminosity.slot()],
            counters[SensorCategory::SoilMoisture.slot()],
        );

        UniSystem {
            transport: SyncTransport::with_config(bus, &config),
            registry,
            clients: ClientFactory::new(config.measurement_cooldown),
            host,
            storage,
            config,
        }
    }

    #[inline]
    pub fn controller_id(&self) -> u8 {
        self.host.controller_id()
    }

    pub fn config(&self) -> &UniConfig {
        &self.config
    }

    pub fn registry(&self) -> &IndexRegistry<H::Module> {
        &self.registry
    }

    pub fn clients(&self) -> &ClientFactory<IF::Instant> {
        &self.clients
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn transport(&self) -> &SyncTransport<IF> {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut SyncTransport<IF> {
        &mut self.transport
    }

    // --- Bus operations ---

    pub fn read_packet(&mut self, line: LineId) -> Result<Packet, UniError<IF::Error>> {
        self.transport.read(line)
    }

    /// Writes `packet` to the module on `line`, stamped with this controller's id.
    pub fn write_packet(
        &mut self,
        line: LineId,
        packet: &mut Packet,
    ) -> Result<(), UniError<IF::Error>> {
        let controller_id = self.host.controller_id();
        self.transport.write(line, packet, controller_id)
    }

    pub fn commit(&mut self, line: LineId) -> Result<(), UniError<IF::Error>> {
        self.transport.commit(line)
    }

    // --- Client dispatch ---

    pub fn bind_client(&mut self, kind: ClientKind, line: LineId) {
        self.clients.bind(kind, line);
    }

    pub fn register_client(&mut self, kind: ClientKind, packet: &Packet) {
        let (clients, mut ctx) = self.split();
        clients.register(kind, &mut ctx, packet);
    }

    pub fn update_client(&mut self, kind: ClientKind, packet: &Packet, is_online: bool) {
        let (clients, mut ctx) = self.split();
        clients.update(kind, &mut ctx, packet, is_online);
    }

    fn split(&mut self) -> (&mut ClientFactory<IF::Instant>, ClientContext<'_, IF, H, S>) {
        let UniSystem {
            transport,
            registry,
            clients,
            host,
            storage,
            ..
        } = self;
        let ctx = ClientContext {
            transport,
            registry,
            host,
            storage,
        };
        (clients, ctx)
    }
}
