//! The full OpenGD77 codeplug: memory map and whole-image codec.
//!
//! The codeplug spans two images: the EEPROM image carries the settings
//! elements, the APRS/DTMF/contact banks, channel bank 0 and the zone
//! bank; the flash image carries the group list, scan list and roaming
//! banks plus channel banks 1..=7. All allocations are aligned to the
//! 32-byte write-block granularity of the device.
//!
//! Encode walks the configuration tree in dependency order: bank slots
//! are assigned to every object first (filling the
//! [`BinaryContext`]), then each record is encoded with its reference
//! fields resolved through that table. Decode is strictly two-phase: the
//! scalar fields of *all* records across *all* banks are decoded before
//! any link pass runs, so every index reference is guaranteed to find its
//! target object no matter the storage order.

use pluglib_core::{
    BinaryContext, ChannelRef, Config, ContactRef, Error, GroupListRef, MemoryTransport, ObjKind,
    PositioningKind, PositioningRef, RadioIdRef, Result, RoamingZoneRef, ScanListRef, Zone,
};
use pluglib_image::{align_size, Image};
use tracing::{debug, warn};

use crate::aprs::{self, APRS_BANK, APRS_SYSTEMS_PER_BANK};
use crate::channel::{
    self, CHANNEL_BANK, CHANNEL_BANK_COUNT, CHANNELS_PER_BANK, MAX_CHANNELS,
};
use crate::contact::{
    self, DMR_CONTACT_BANK, DMR_CONTACTS_PER_BANK, DTMF_CONTACT_BANK, DTMF_CONTACTS_PER_BANK,
};
use crate::grouplist::{self, GROUP_LIST_BANK, GROUP_LISTS_PER_BANK};
use crate::roamingzone::{self, ROAMING_ZONE_BANK, ROAMING_ZONES_PER_BANK};
use crate::scanlist::{self, SCAN_LIST_BANK, SCAN_LISTS_PER_BANK};
use crate::settings::{
    decode_boot_settings, decode_general_settings, encode_boot_settings, encode_general_settings,
    BOOT_SETTINGS_SIZE, GENERAL_SETTINGS_SIZE,
};
use crate::zone::{self, ZONE_BANK, ZONES_PER_BANK};

/// Write-block granularity of the device.
pub const BLOCK_SIZE: usize = 32;

/// Transport bank of the EEPROM image.
pub const EEPROM_BANK: u32 = 0;

/// Transport bank of the flash image.
pub const FLASH_BANK: u32 = 1;

mod addr {
    pub const GENERAL_SETTINGS: u32 = 0x0000_0080;
    pub const BOOT_SETTINGS: u32 = 0x0000_00e0;
    pub const APRS_BANK: u32 = 0x0000_0200;
    pub const DTMF_CONTACT_BANK: u32 = 0x0000_0800;
    pub const DMR_CONTACT_BANK: u32 = 0x0000_1000;
    pub const CHANNEL_BANK_0: u32 = 0x0000_3780;
    pub const ZONE_BANK: u32 = 0x0000_8010;

    pub const GROUP_LIST_BANK: u32 = 0x0001_0000;
    pub const SCAN_LIST_BANK: u32 = 0x0001_2000;
    pub const ROAMING_BANK: u32 = 0x0001_4000;
    pub const CHANNEL_BANK_1: u32 = 0x0007_b1b0;
    pub const CHANNEL_BANK_STRIDE: u32 = 0x1c20;
}

/// The binary codeplug of an OpenGD77-family radio.
#[derive(Debug, Clone)]
pub struct OpenGd77Codeplug {
    eeprom: Image,
    flash: Image,
}

impl OpenGd77Codeplug {
    /// Create a codeplug with the full memory map allocated (and zeroed).
    pub fn new() -> Self {
        let mut eeprom = Image::new("EEPROM", EEPROM_BANK);
        eeprom.add_element(
            addr::GENERAL_SETTINGS,
            align_size(GENERAL_SETTINGS_SIZE, BLOCK_SIZE),
        );
        eeprom.add_element(
            addr::BOOT_SETTINGS,
            align_size(BOOT_SETTINGS_SIZE, BLOCK_SIZE),
        );
        eeprom.add_element(addr::APRS_BANK, align_size(APRS_BANK.size(), BLOCK_SIZE));
        eeprom.add_element(
            addr::DTMF_CONTACT_BANK,
            align_size(DTMF_CONTACT_BANK.size(), BLOCK_SIZE),
        );
        eeprom.add_element(
            addr::DMR_CONTACT_BANK,
            align_size(DMR_CONTACT_BANK.size(), BLOCK_SIZE),
        );
        eeprom.add_element(
            addr::CHANNEL_BANK_0,
            align_size(CHANNEL_BANK.size(), BLOCK_SIZE),
        );
        eeprom.add_element(addr::ZONE_BANK, align_size(ZONE_BANK.size(), BLOCK_SIZE));

        let mut flash = Image::new("Flash", FLASH_BANK);
        flash.add_element(
            addr::GROUP_LIST_BANK,
            align_size(GROUP_LIST_BANK.size(), BLOCK_SIZE),
        );
        flash.add_element(
            addr::SCAN_LIST_BANK,
            align_size(SCAN_LIST_BANK.size(), BLOCK_SIZE),
        );
        flash.add_element(
            addr::ROAMING_BANK,
            align_size(ROAMING_ZONE_BANK.size(), BLOCK_SIZE),
        );
        for bank in 1..CHANNEL_BANK_COUNT {
            flash.add_element(
                addr::CHANNEL_BANK_1 + (bank as u32 - 1) * addr::CHANNEL_BANK_STRIDE,
                align_size(CHANNEL_BANK.size(), BLOCK_SIZE),
            );
        }

        OpenGd77Codeplug { eeprom, flash }
    }

    /// The EEPROM image.
    pub fn eeprom(&self) -> &Image {
        &self.eeprom
    }

    /// The flash image.
    pub fn flash(&self) -> &Image {
        &self.flash
    }

    /// Read both images from the device.
    pub fn read_from(&mut self, transport: &mut dyn MemoryTransport) -> Result<()> {
        self.eeprom.read_from(transport)?;
        self.flash.read_from(transport)
    }

    /// Write both images to the device.
    pub fn write_to(&self, transport: &mut dyn MemoryTransport) -> Result<()> {
        self.eeprom.write_to(transport)?;
        self.flash.write_to(transport)
    }

    fn channel_bank(&self, bank: usize) -> &[u8] {
        if bank == 0 {
            self.eeprom.data(addr::CHANNEL_BANK_0, CHANNEL_BANK.size())
        } else {
            self.flash.data(
                addr::CHANNEL_BANK_1 + (bank as u32 - 1) * addr::CHANNEL_BANK_STRIDE,
                CHANNEL_BANK.size(),
            )
        }
    }

    fn channel_bank_mut(&mut self, bank: usize) -> &mut [u8] {
        if bank == 0 {
            self.eeprom
                .data_mut(addr::CHANNEL_BANK_0, CHANNEL_BANK.size())
        } else {
            self.flash.data_mut(
                addr::CHANNEL_BANK_1 + (bank as u32 - 1) * addr::CHANNEL_BANK_STRIDE,
                CHANNEL_BANK.size(),
            )
        }
    }

    /// Encode `config` into the binary images.
    ///
    /// Fails without side effects visible to the caller's configuration;
    /// a failed encode leaves the codeplug images in an unspecified state
    /// and they must be discarded.
    pub fn encode(&mut self, config: &Config) -> Result<()> {
        let ctx = assign_slots(config)?;

        // Settings elements.
        encode_general_settings(
            self.eeprom
                .data_mut(addr::GENERAL_SETTINGS, GENERAL_SETTINGS_SIZE),
            config.settings(),
            config.radio_ids().default_id(),
        );
        encode_boot_settings(
            self.eeprom.data_mut(addr::BOOT_SETTINGS, BOOT_SETTINGS_SIZE),
            config.settings(),
        );

        // Channel banks.
        for bank in 0..CHANNEL_BANK_COUNT {
            let channels = config.channels();
            let bank_buf = self.channel_bank_mut(bank);
            for slot in 0..CHANNELS_PER_BANK {
                let index = bank * CHANNELS_PER_BANK + slot;
                match channels.get(index) {
                    Some(ch) => {
                        let location = format!("channels[{index}] '{}'", ch.name);
                        channel::encode_channel(
                            CHANNEL_BANK.slot_mut(bank_buf, slot),
                            &location,
                            ch,
                            config,
                            &ctx,
                        )?;
                        CHANNEL_BANK.enable(bank_buf, slot, true);
                    }
                    None => {
                        channel::clear_channel(CHANNEL_BANK.slot_mut(bank_buf, slot));
                        CHANNEL_BANK.enable(bank_buf, slot, false);
                    }
                }
            }
        }

        // Contact banks. DMR and DTMF contacts are interleaved in the
        // configuration but live in separate banks.
        {
            let bank_buf = self
                .eeprom
                .data_mut(addr::DMR_CONTACT_BANK, DMR_CONTACT_BANK.size());
            let mut slot = 0;
            for (index, c) in config.contacts().iter().enumerate() {
                if !c.is_dmr() {
                    continue;
                }
                let location = format!("contacts[{index}] '{}'", c.name);
                contact::encode_dmr_contact(
                    DMR_CONTACT_BANK.slot_mut(bank_buf, slot),
                    &location,
                    c,
                )?;
                DMR_CONTACT_BANK.enable(bank_buf, slot, true);
                slot += 1;
            }
            for unused in slot..DMR_CONTACTS_PER_BANK {
                DMR_CONTACT_BANK.slot_mut(bank_buf, unused).fill(0);
                DMR_CONTACT_BANK.enable(bank_buf, unused, false);
            }
        }
        {
            let bank_buf = self
                .eeprom
                .data_mut(addr::DTMF_CONTACT_BANK, DTMF_CONTACT_BANK.size());
            let mut slot = 0;
            for (index, c) in config.contacts().iter().enumerate() {
                if !c.is_dtmf() {
                    continue;
                }
                let location = format!("contacts[{index}] '{}'", c.name);
                contact::encode_dtmf_contact(
                    DTMF_CONTACT_BANK.slot_mut(bank_buf, slot),
                    &location,
                    c,
                )?;
                DTMF_CONTACT_BANK.enable(bank_buf, slot, true);
                slot += 1;
            }
            for unused in slot..DTMF_CONTACTS_PER_BANK {
                DTMF_CONTACT_BANK.slot_mut(bank_buf, unused).fill(0);
                DTMF_CONTACT_BANK.enable(bank_buf, unused, false);
            }
        }

        // Group lists.
        {
            let bank_buf = self
                .flash
                .data_mut(addr::GROUP_LIST_BANK, GROUP_LIST_BANK.size());
            for slot in 0..GROUP_LISTS_PER_BANK {
                match config.group_lists().get(slot) {
                    Some(list) => {
                        let location = format!("groupLists[{slot}] '{}'", list.name);
                        grouplist::encode_group_list(
                            GROUP_LIST_BANK.slot_mut(bank_buf, slot),
                            &location,
                            list,
                            &ctx,
                        )?;
                        GROUP_LIST_BANK.enable(bank_buf, slot, true);
                    }
                    None => {
                        GROUP_LIST_BANK.slot_mut(bank_buf, slot).fill(0);
                        GROUP_LIST_BANK.enable(bank_buf, slot, false);
                    }
                }
            }
        }

        // Zones.
        {
            let bank_buf = self.eeprom.data_mut(addr::ZONE_BANK, ZONE_BANK.size());
            for slot in 0..ZONES_PER_BANK {
                match config.zones().get(slot) {
                    Some(z) => {
                        let location = format!("zones[{slot}] '{}'", z.name);
                        zone::encode_zone(ZONE_BANK.slot_mut(bank_buf, slot), &location, z, &ctx)?;
                        ZONE_BANK.enable(bank_buf, slot, true);
                    }
                    None => {
                        ZONE_BANK.slot_mut(bank_buf, slot).fill(0);
                        ZONE_BANK.enable(bank_buf, slot, false);
                    }
                }
            }
        }

        // Scan lists.
        {
            let bank_buf = self
                .flash
                .data_mut(addr::SCAN_LIST_BANK, SCAN_LIST_BANK.size());
            for slot in 0..SCAN_LISTS_PER_BANK {
                match config.scan_lists().get(slot) {
                    Some(list) => {
                        let location = format!("scanLists[{slot}] '{}'", list.name);
                        scanlist::encode_scan_list(
                            SCAN_LIST_BANK.slot_mut(bank_buf, slot),
                            &location,
                            list,
                            &ctx,
                        )?;
                        SCAN_LIST_BANK.enable(bank_buf, slot, true);
                    }
                    None => {
                        SCAN_LIST_BANK.slot_mut(bank_buf, slot).fill(0);
                        SCAN_LIST_BANK.enable(bank_buf, slot, false);
                    }
                }
            }
        }

        // Roaming zones.
        {
            let bank_buf = self.flash.data_mut(addr::ROAMING_BANK, ROAMING_ZONE_BANK.size());
            for slot in 0..ROAMING_ZONES_PER_BANK {
                match config.roaming().get(slot) {
                    Some(z) => {
                        let location = format!("roaming[{slot}] '{}'", z.name);
                        roamingzone::encode_roaming_zone(
                            ROAMING_ZONE_BANK.slot_mut(bank_buf, slot),
                            &location,
                            z,
                            &ctx,
                        )?;
                        ROAMING_ZONE_BANK.enable(bank_buf, slot, true);
                    }
                    None => {
                        ROAMING_ZONE_BANK.slot_mut(bank_buf, slot).fill(0);
                        ROAMING_ZONE_BANK.enable(bank_buf, slot, false);
                    }
                }
            }
        }

        // APRS systems. DMR GPS systems have no slot in this layout.
        {
            let bank_buf = self.eeprom.data_mut(addr::APRS_BANK, APRS_BANK.size());
            let mut slot = 0;
            for (index, sys) in config.positioning().iter().enumerate() {
                match sys.kind {
                    PositioningKind::Aprs(_) => {
                        let location = format!("positioning[{index}] '{}'", sys.name);
                        aprs::encode_aprs_system(
                            APRS_BANK.slot_mut(bank_buf, slot),
                            &location,
                            sys,
                        )?;
                        APRS_BANK.enable(bank_buf, slot, true);
                        slot += 1;
                    }
                    PositioningKind::DmrGps(_) => {
                        warn!(
                            "positioning[{index}] '{}': DMR GPS systems are not stored by \
                             this radio, skipping",
                            sys.name
                        );
                    }
                }
            }
            for unused in slot..APRS_SYSTEMS_PER_BANK {
                APRS_BANK.slot_mut(bank_buf, unused).fill(0);
                APRS_BANK.enable(bank_buf, unused, false);
            }
        }

        debug!(
            channels = config.channels().len(),
            zones = config.zones().len(),
            contacts = config.contacts().len(),
            "encoded codeplug"
        );
        Ok(())
    }

    /// Decode the binary images into a fresh configuration.
    ///
    /// Two-phase: all records' scalar fields first, across all banks, then
    /// the link passes that resolve index references.
    pub fn decode(&self) -> Result<Config> {
        let mut config = Config::new();
        let mut ctx = BinaryContext::new();

        // Settings and the default radio ID.
        let (mut settings, default_id) = decode_general_settings(
            self.eeprom.data(addr::GENERAL_SETTINGS, GENERAL_SETTINGS_SIZE),
        );
        let (line1, line2) =
            decode_boot_settings(self.eeprom.data(addr::BOOT_SETTINGS, BOOT_SETTINGS_SIZE));
        settings.intro_line1 = line1;
        settings.intro_line2 = line2;
        config.modify_settings(|s| *s = settings);
        if let Some(id) = default_id {
            let index = config.radio_ids_mut().add(id);
            ctx.add(RadioIdRef(index).into(), index);
        }

        // Phase one: scalar decode of every enabled slot of every bank.
        {
            let bank_buf = self
                .eeprom
                .data(addr::DMR_CONTACT_BANK, DMR_CONTACT_BANK.size());
            for slot in 0..DMR_CONTACTS_PER_BANK {
                if !DMR_CONTACT_BANK.is_enabled(bank_buf, slot) {
                    continue;
                }
                let location = format!("contact bank, slot {slot}");
                let c = contact::decode_dmr_contact(DMR_CONTACT_BANK.slot(bank_buf, slot), &location)?;
                let index = config.contacts_mut().add(c);
                ctx.add(ContactRef(index).into(), slot);
            }
        }
        {
            let bank_buf = self
                .eeprom
                .data(addr::DTMF_CONTACT_BANK, DTMF_CONTACT_BANK.size());
            for slot in 0..DTMF_CONTACTS_PER_BANK {
                if !DTMF_CONTACT_BANK.is_enabled(bank_buf, slot) {
                    continue;
                }
                let c = contact::decode_dtmf_contact(DTMF_CONTACT_BANK.slot(bank_buf, slot));
                config.contacts_mut().add(c);
            }
        }
        {
            let bank_buf = self.flash.data(addr::GROUP_LIST_BANK, GROUP_LIST_BANK.size());
            for slot in 0..GROUP_LISTS_PER_BANK {
                if !GROUP_LIST_BANK.is_enabled(bank_buf, slot) {
                    continue;
                }
                let list = grouplist::decode_group_list(GROUP_LIST_BANK.slot(bank_buf, slot));
                let index = config.group_lists_mut().add(list);
                ctx.add(GroupListRef(index).into(), slot);
            }
        }
        {
            let bank_buf = self.eeprom.data(addr::APRS_BANK, APRS_BANK.size());
            for slot in 0..APRS_SYSTEMS_PER_BANK {
                if !APRS_BANK.is_enabled(bank_buf, slot) {
                    continue;
                }
                let sys = aprs::decode_aprs_system(APRS_BANK.slot(bank_buf, slot));
                let index = config.positioning_mut().add(sys);
                ctx.add(PositioningRef(index).into(), slot);
            }
        }
        for bank in 0..CHANNEL_BANK_COUNT {
            let bank_buf = self.channel_bank(bank);
            for slot in 0..CHANNELS_PER_BANK {
                if !CHANNEL_BANK.is_enabled(bank_buf, slot) {
                    continue;
                }
                let global = bank * CHANNELS_PER_BANK + slot;
                let location = format!("channel bank {bank}, slot {slot}");
                let ch = channel::decode_channel(CHANNEL_BANK.slot(bank_buf, slot), &location)?;
                let index = config.channels_mut().add(ch);
                ctx.add(ChannelRef(index).into(), global);
            }
        }
        {
            let bank_buf = self.eeprom.data(addr::ZONE_BANK, ZONE_BANK.size());
            for slot in 0..ZONES_PER_BANK {
                if !ZONE_BANK.is_enabled(bank_buf, slot) {
                    continue;
                }
                let z: Zone = zone::decode_zone(ZONE_BANK.slot(bank_buf, slot));
                let index = config.zones_mut().add(z);
                ctx.add(pluglib_core::ZoneRef(index).into(), slot);
            }
        }
        {
            let bank_buf = self.flash.data(addr::SCAN_LIST_BANK, SCAN_LIST_BANK.size());
            for slot in 0..SCAN_LISTS_PER_BANK {
                if !SCAN_LIST_BANK.is_enabled(bank_buf, slot) {
                    continue;
                }
                let list = scanlist::decode_scan_list(SCAN_LIST_BANK.slot(bank_buf, slot));
                let index = config.scan_lists_mut().add(list);
                ctx.add(ScanListRef(index).into(), slot);
            }
        }
        {
            let bank_buf = self.flash.data(addr::ROAMING_BANK, ROAMING_ZONE_BANK.size());
            for slot in 0..ROAMING_ZONES_PER_BANK {
                if !ROAMING_ZONE_BANK.is_enabled(bank_buf, slot) {
                    continue;
                }
                let z = roamingzone::decode_roaming_zone(ROAMING_ZONE_BANK.slot(bank_buf, slot));
                let index = config.roaming_mut().add(z);
                ctx.add(RoamingZoneRef(index).into(), slot);
            }
        }

        // Phase two: link every record that carries references.
        {
            let bank_buf = self.flash.data(addr::GROUP_LIST_BANK, GROUP_LIST_BANK.size());
            for slot in 0..GROUP_LISTS_PER_BANK {
                if !GROUP_LIST_BANK.is_enabled(bank_buf, slot) {
                    continue;
                }
                let location = format!("group list bank, slot {slot}");
                let obj = ctx.object_at(&location, ObjKind::GroupList, slot)?;
                grouplist::link_group_list(
                    GROUP_LIST_BANK.slot(bank_buf, slot),
                    &location,
                    &mut config,
                    obj.index,
                    &ctx,
                )?;
            }
        }
        for bank in 0..CHANNEL_BANK_COUNT {
            let bank_buf = self.channel_bank(bank);
            for slot in 0..CHANNELS_PER_BANK {
                if !CHANNEL_BANK.is_enabled(bank_buf, slot) {
                    continue;
                }
                let global = bank * CHANNELS_PER_BANK + slot;
                let location = format!("channel bank {bank}, slot {slot}");
                let obj = ctx.object_at(&location, ObjKind::Channel, global)?;
                channel::link_channel(
                    CHANNEL_BANK.slot(bank_buf, slot),
                    &location,
                    &mut config,
                    obj.index,
                    &ctx,
                )?;
            }
        }
        {
            let bank_buf = self.eeprom.data(addr::ZONE_BANK, ZONE_BANK.size());
            for slot in 0..ZONES_PER_BANK {
                if !ZONE_BANK.is_enabled(bank_buf, slot) {
                    continue;
                }
                let location = format!("zone bank, slot {slot}");
                let obj = ctx.object_at(&location, ObjKind::Zone, slot)?;
                zone::link_zone(
                    ZONE_BANK.slot(bank_buf, slot),
                    &location,
                    &mut config,
                    obj.index,
                    &ctx,
                )?;
            }
        }
        {
            let bank_buf = self.flash.data(addr::SCAN_LIST_BANK, SCAN_LIST_BANK.size());
            for slot in 0..SCAN_LISTS_PER_BANK {
                if !SCAN_LIST_BANK.is_enabled(bank_buf, slot) {
                    continue;
                }
                let location = format!("scan list bank, slot {slot}");
                let obj = ctx.object_at(&location, ObjKind::ScanList, slot)?;
                scanlist::link_scan_list(
                    SCAN_LIST_BANK.slot(bank_buf, slot),
                    &location,
                    &mut config,
                    obj.index,
                    &ctx,
                )?;
            }
        }
        {
            let bank_buf = self.flash.data(addr::ROAMING_BANK, ROAMING_ZONE_BANK.size());
            for slot in 0..ROAMING_ZONES_PER_BANK {
                if !ROAMING_ZONE_BANK.is_enabled(bank_buf, slot) {
                    continue;
                }
                let location = format!("roaming bank, slot {slot}");
                let obj = ctx.object_at(&location, ObjKind::RoamingZone, slot)?;
                roamingzone::link_roaming_zone(
                    ROAMING_ZONE_BANK.slot(bank_buf, slot),
                    &location,
                    &mut config,
                    obj.index,
                    &ctx,
                )?;
            }
        }

        config.set_modified(false);
        let _ = config.drain_events();
        Ok(config)
    }
}

impl Default for OpenGd77Codeplug {
    fn default() -> Self {
        OpenGd77Codeplug::new()
    }
}

/// Assign a bank slot to every encodable object, checking capacities.
fn assign_slots(config: &Config) -> Result<BinaryContext> {
    let mut ctx = BinaryContext::new();

    if config.channels().len() > MAX_CHANNELS {
        return Err(Error::encode(
            "channels",
            format!(
                "{} channels exceed the capacity {MAX_CHANNELS}",
                config.channels().len()
            ),
        ));
    }
    for index in 0..config.channels().len() {
        ctx.add(ChannelRef(index).into(), index);
    }

    let dmr_contacts = config.contacts().iter().filter(|c| c.is_dmr()).count();
    let dtmf_contacts = config.contacts().len() - dmr_contacts;
    if dmr_contacts > DMR_CONTACTS_PER_BANK {
        return Err(Error::encode(
            "contacts",
            format!("{dmr_contacts} DMR contacts exceed the capacity {DMR_CONTACTS_PER_BANK}"),
        ));
    }
    if dtmf_contacts > DTMF_CONTACTS_PER_BANK {
        return Err(Error::encode(
            "contacts",
            format!("{dtmf_contacts} DTMF contacts exceed the capacity {DTMF_CONTACTS_PER_BANK}"),
        ));
    }
    let mut slot = 0;
    for (index, c) in config.contacts().iter().enumerate() {
        if c.is_dmr() {
            ctx.add(ContactRef(index).into(), slot);
            slot += 1;
        }
    }

    check_capacity("group lists", config.group_lists().len(), GROUP_LISTS_PER_BANK)?;
    for index in 0..config.group_lists().len() {
        ctx.add(GroupListRef(index).into(), index);
    }

    check_capacity("zones", config.zones().len(), ZONES_PER_BANK)?;
    for index in 0..config.zones().len() {
        ctx.add(pluglib_core::ZoneRef(index).into(), index);
    }

    check_capacity("scan lists", config.scan_lists().len(), SCAN_LISTS_PER_BANK)?;
    for index in 0..config.scan_lists().len() {
        ctx.add(ScanListRef(index).into(), index);
    }

    check_capacity("roaming zones", config.roaming().len(), ROAMING_ZONES_PER_BANK)?;
    for index in 0..config.roaming().len() {
        ctx.add(RoamingZoneRef(index).into(), index);
    }

    let aprs_systems = config.positioning().iter().filter(|s| s.is_aprs()).count();
    check_capacity("APRS systems", aprs_systems, APRS_SYSTEMS_PER_BANK)?;
    let mut slot = 0;
    for (index, sys) in config.positioning().iter().enumerate() {
        if sys.is_aprs() {
            ctx.add(PositioningRef(index).into(), slot);
            slot += 1;
        }
    }

    for index in 0..config.radio_ids().len() {
        ctx.add(RadioIdRef(index).into(), index);
    }

    Ok(ctx)
}

fn check_capacity(what: &str, count: usize, capacity: usize) -> Result<()> {
    if count > capacity {
        return Err(Error::encode(
            what,
            format!("{count} {what} exceed the capacity {capacity}"),
        ));
    }
    Ok(())
}
