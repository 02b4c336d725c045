//! Known-column allow-lists and the versioned schema migration list.
//!
//! The allow-lists drive schema-drift tolerance: outbound payloads are
//! stripped down to the columns the server is known to have, so a client
//! built against a newer entity shape degrades to the deployed schema
//! instead of failing the whole write.
//!
//! Migrations are explicit and versioned, and are applied out-of-band by an
//! operator call (`TableClient::apply_migrations`), never inferred at
//! runtime from error text.

/// Columns of the `trips` table.
pub const TRIP_COLUMNS: &[&str] = &[
    "id",
    "user_id",
    "destination",
    "title",
    "description",
    "start_date",
    "end_date",
    "status",
    "created_at",
    "updated_at",
];

/// Columns of the `itinerary_days` table.
pub const ITINERARY_DAY_COLUMNS: &[&str] = &[
    "id",
    "trip_id",
    "day_number",
    "date",
    "title",
    "created_at",
    "updated_at",
];

/// Columns of the `activities` table.
pub const ACTIVITY_COLUMNS: &[&str] = &[
    "id",
    "itinerary_day_id",
    "title",
    "time",
    "type",
    "notes",
    "created_at",
    "updated_at",
];

/// One versioned schema change. Versions are contiguous and applied in
/// ascending order.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

/// The full ordered migration list.
pub fn migrations() -> &'static [Migration] {
    const MIGRATIONS: &[Migration] = &[
        Migration {
            version: 1,
            name: "create_trips",
            sql: "CREATE TABLE IF NOT EXISTS trips (\
                  id UUID PRIMARY KEY DEFAULT uuid_generate_v4(), \
                  user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE, \
                  destination TEXT NOT NULL, \
                  title TEXT NOT NULL, \
                  description TEXT, \
                  start_date DATE NOT NULL, \
                  end_date DATE NOT NULL, \
                  status TEXT DEFAULT 'planned', \
                  created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW(), \
                  updated_at TIMESTAMP WITH TIME ZONE DEFAULT NOW());",
        },
        Migration {
            version: 2,
            name: "create_itinerary_days",
            sql: "CREATE TABLE IF NOT EXISTS itinerary_days (\
                  id UUID PRIMARY KEY DEFAULT uuid_generate_v4(), \
                  trip_id UUID NOT NULL REFERENCES trips(id) ON DELETE CASCADE, \
                  day_number INTEGER NOT NULL, \
                  date DATE NOT NULL, \
                  title TEXT, \
                  created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW(), \
                  updated_at TIMESTAMP WITH TIME ZONE DEFAULT NOW());",
        },
        Migration {
            version: 3,
            name: "create_activities",
            sql: "CREATE TABLE IF NOT EXISTS activities (\
                  id UUID PRIMARY KEY DEFAULT uuid_generate_v4(), \
                  itinerary_day_id UUID NOT NULL REFERENCES itinerary_days(id) ON DELETE CASCADE, \
                  title TEXT NOT NULL, \
                  type TEXT DEFAULT 'activity', \
                  notes TEXT, \
                  created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW(), \
                  updated_at TIMESTAMP WITH TIME ZONE DEFAULT NOW());",
        },
        Migration {
            version: 4,
            name: "add_activity_time",
            sql: "ALTER TABLE activities ADD COLUMN IF NOT EXISTS time TEXT;",
        },
        Migration {
            version: 5,
            name: "enable_row_level_security",
            sql: "ALTER TABLE trips ENABLE ROW LEVEL SECURITY; \
                  ALTER TABLE itinerary_days ENABLE ROW LEVEL SECURITY; \
                  ALTER TABLE activities ENABLE ROW LEVEL SECURITY;",
        },
        Migration {
            version: 6,
            name: "add_owner_policies",
            sql: "CREATE POLICY \"Users can manage their own trips\" \
                  ON trips FOR ALL TO authenticated \
                  USING (auth.uid() = user_id); \
                  CREATE POLICY \"Users can manage their own itinerary days\" \
                  ON itinerary_days FOR ALL TO authenticated \
                  USING (EXISTS (\
                  SELECT 1 FROM trips \
                  WHERE trips.id = itinerary_days.trip_id \
                  AND trips.user_id = auth.uid())); \
                  CREATE POLICY \"Users can manage their own activities\" \
                  ON activities FOR ALL TO authenticated \
                  USING (EXISTS (\
                  SELECT 1 FROM itinerary_days \
                  JOIN trips ON trips.id = itinerary_days.trip_id \
                  WHERE itinerary_days.id = activities.itinerary_day_id \
                  AND trips.user_id = auth.uid()));",
        },
    ];
    MIGRATIONS
}
