//! BMA421 accelerometer on the PineTime's I2C bus
//!
//! Only the raw acceleration path is used: the chip runs at 100 Hz, ±4g,
//! and samples are polled. Flick detection happens in software, see
//! [`crate::gesture`].

use embedded_hal::i2c::I2c;

/// I2C address on the PineTime (SDO pulled low)
pub const DEFAULT_I2C_ADDR: u8 = 0x18;

/// Raw counts per g at ±4g
pub const COUNTS_PER_G: i16 = 512;

const REG_CHIP_ID: u8 = 0x00;
const REG_DATA_8: u8 = 0x12; // ACC_X LSB .. ACC_Z MSB
const REG_ACC_CONF: u8 = 0x40;
const REG_ACC_RANGE: u8 = 0x41;
const REG_PWR_CONF: u8 = 0x7C;
const REG_PWR_CTRL: u8 = 0x7D;

const CHIP_ID: u8 = 0x11;

// acc_perf_mode | acc_bwp = avg4 | acc_odr = 100 Hz
const ACC_CONF_100HZ: u8 = 0x80 | (0x02 << 4) | 0x08;
const ACC_RANGE_4G: u8 = 0x01;
const PWR_CTRL_ACC_EN: u8 = 0x04;

/// One acceleration reading in raw counts, `[x, y, z]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelSample {
    pub accel: [i16; 3],
}

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    Bus(E),
    BadChipId(u8),
}

pub struct Bma421<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> Bma421<I2C>
where
    I2C: I2c,
{
    /// Probe the chip and start the accelerometer.
    pub fn new(i2c: I2C, address: u8) -> Result<Self, Error<I2C::Error>> {
        let mut accel = Self { i2c, address };
        accel.init()?;
        Ok(accel)
    }

    pub fn chip_id(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_reg(REG_CHIP_ID)
    }

    fn init(&mut self) -> Result<(), Error<I2C::Error>> {
        let id = self.chip_id()?;
        if id != CHIP_ID {
            return Err(Error::BadChipId(id));
        }

        // Advanced power save off, otherwise register writes need gaps
        self.write_reg(REG_PWR_CONF, 0x00)?;
        self.write_reg(REG_ACC_CONF, ACC_CONF_100HZ)?;
        self.write_reg(REG_ACC_RANGE, ACC_RANGE_4G)?;
        self.write_reg(REG_PWR_CTRL, PWR_CTRL_ACC_EN)?;

        #[cfg(feature = "defmt")]
        defmt::info!("BMA421 ready at {=u8:#x}", self.address);

        Ok(())
    }

    /// Read the latest acceleration sample.
    pub fn read_sample(&mut self) -> Result<AccelSample, Error<I2C::Error>> {
        let mut buf = [0u8; 6];
        self.i2c
            .write_read(self.address, &[REG_DATA_8], &mut buf)
            .map_err(Error::Bus)?;

        // 12-bit values, left aligned in the 16-bit register pair
        let axis = |lsb: u8, msb: u8| i16::from_le_bytes([lsb, msb]) >> 4;
        Ok(AccelSample {
            accel: [
                axis(buf[0], buf[1]),
                axis(buf[2], buf[3]),
                axis(buf[4], buf[5]),
            ],
        })
    }

    fn write_reg(&mut self, reg: u8, val: u8) -> Result<(), Error<I2C::Error>> {
        self.i2c
            .write(self.address, &[reg, val])
            .map_err(Error::Bus)
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, Error<I2C::Error>> {
        let mut out = [0u8];
        self.i2c
            .write_read(self.address, &[reg], &mut out)
            .map_err(Error::Bus)?;
        Ok(out[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    fn init_transactions() -> Vec<I2cTransaction> {
        vec![
            I2cTransaction::write_read(DEFAULT_I2C_ADDR, vec![REG_CHIP_ID], vec![CHIP_ID]),
            I2cTransaction::write(DEFAULT_I2C_ADDR, vec![REG_PWR_CONF, 0x00]),
            I2cTransaction::write(DEFAULT_I2C_ADDR, vec![REG_ACC_CONF, 0xA8]),
            I2cTransaction::write(DEFAULT_I2C_ADDR, vec![REG_ACC_RANGE, 0x01]),
            I2cTransaction::write(DEFAULT_I2C_ADDR, vec![REG_PWR_CTRL, 0x04]),
        ]
    }

    #[test]
    fn test_init_configures_accelerometer() {
        let mut i2c = I2cMock::new(&init_transactions());
        let accel = Bma421::new(i2c.clone(), DEFAULT_I2C_ADDR);
        assert!(accel.is_ok());
        i2c.done();
    }

    #[test]
    fn test_wrong_chip_id() {
        let mut i2c = I2cMock::new(&[I2cTransaction::write_read(
            DEFAULT_I2C_ADDR,
            vec![REG_CHIP_ID],
            vec![0x13],
        )]);
        match Bma421::new(i2c.clone(), DEFAULT_I2C_ADDR) {
            Err(Error::BadChipId(id)) => assert_eq!(id, 0x13),
            _ => panic!("expected BadChipId"),
        }
        i2c.done();
    }

    #[test]
    fn test_read_sample_sign_extends() {
        let mut transactions = init_transactions();
        // x = +512 (1g), y = -512, z = 0
        let x = (512i16 << 4).to_le_bytes();
        let y = (-512i16 << 4).to_le_bytes();
        transactions.push(I2cTransaction::write_read(
            DEFAULT_I2C_ADDR,
            vec![REG_DATA_8],
            vec![x[0], x[1], y[0], y[1], 0x00, 0x00],
        ));

        let mut i2c = I2cMock::new(&transactions);
        let mut accel = Bma421::new(i2c.clone(), DEFAULT_I2C_ADDR).unwrap();
        let sample = accel.read_sample().unwrap();
        assert_eq!(sample.accel, [COUNTS_PER_G, -COUNTS_PER_G, 0]);
        i2c.done();
    }
}
