//! Static briefing table for well-known destinations, served when the
//! upstream content services are unreachable.

/// Pre-written content for one destination.
#[derive(Debug)]
pub struct KnownDestination {
    pub name: &'static str,
    pub description: &'static str,
    pub details: &'static str,
    pub attractions: &'static str,
}

/// Look up a destination in the static table by exact name.
pub fn known_destination(name: &str) -> Option<&'static KnownDestination> {
    KNOWN_DESTINATIONS.iter().find(|entry| entry.name == name)
}

const KNOWN_DESTINATIONS: &[KnownDestination] = &[
    KnownDestination {
        name: "Paris",
        description: "The City of Light, known for its iconic Eiffel Tower, world-class museums, and exquisite cuisine.",
        details: "Best time to visit: April-June, September-November\n\
Popular attractions and activities: Eiffel Tower, Louvre Museum, Notre-Dame Cathedral, Arc de Triomphe, River Seine cruises\n\
Local cuisine and food recommendations: Croissants, Coq au Vin, French pastries, Fine dining restaurants\n\
Transportation tips: Metro system is extensive and efficient, Walking is great for central areas\n\
Cultural highlights and customs: Art, fashion, café culture, Wine appreciation\n\
Estimated daily budget (in USD): $150-200\n\
Safety tips: Be aware of pickpockets in tourist areas, Keep valuables secure\n\
Local weather and climate: Mild with occasional rain, Warm summers and cool winters",
        attractions: "Top Attractions in Paris:\n\
1. Eiffel Tower - Iconic symbol of Paris, offering stunning city views especially at sunset\n\
2. Louvre Museum - Home to the Mona Lisa and countless masterpieces\n\
3. Notre-Dame Cathedral - Gothic masterpiece currently under restoration\n\
4. Arc de Triomphe - Historic monument offering views down the Champs-Élysées\n\
5. Palace of Versailles - Opulent royal château with magnificent gardens\n\
6. Musée d'Orsay - Impressive collection of Impressionist art\n\
7. Seine River - Take a river cruise to see the city from the water\n\
8. Montmartre - Artistic neighborhood with Sacré-Cœur Basilica\n\
9. Latin Quarter - Historic area with charming cafes and bookshops\n\
10. Jardin des Tuileries - Beautiful garden between Louvre and Place de la Concorde",
    },
    KnownDestination {
        name: "Tokyo",
        description: "A fascinating blend of ultramodern and traditional, Tokyo is Japan's bustling capital.",
        details: "Best time to visit: March-April (cherry blossoms), October-November\n\
Popular attractions and activities: Shibuya Crossing, Senso-ji Temple, Tokyo Skytree, Tsukiji Fish Market\n\
Local cuisine and food recommendations: Sushi, Ramen, Tempura, Izakaya dining\n\
Transportation tips: Efficient train and subway system, Get a IC transport card\n\
Cultural highlights and customs: Respect local etiquette, Bow when greeting, Remove shoes indoors\n\
Estimated daily budget (in USD): $100-150\n\
Safety tips: One of the safest major cities, Natural disaster preparation\n\
Local weather and climate: Hot humid summers, Mild winters, Cherry blossom season in spring",
        attractions: "Top Attractions in Tokyo:\n\
1. Senso-ji Temple - Tokyo's oldest Buddhist temple in Asakusa\n\
2. Shibuya Crossing - World's busiest pedestrian crossing\n\
3. Tokyo Skytree - Tallest structure in Japan with observation decks\n\
4. Meiji Shrine - Serene Shinto shrine in a forest setting\n\
5. Shinjuku Gyoen - Beautiful park perfect for cherry blossom viewing\n\
6. Tsukiji Outer Market - Famous for fresh seafood and street food\n\
7. Akihabara - Electronics and anime culture district\n\
8. Imperial Palace - Home of Japan's Imperial Family\n\
9. Ueno Park - Large public park with multiple museums\n\
10. Tokyo Tower - Iconic communications and observation tower",
    },
    KnownDestination {
        name: "New York",
        description: "The City That Never Sleeps, featuring iconic skyscrapers, Broadway shows, and diverse culture.",
        details: "Best time to visit: April-June, September-November\n\
Popular attractions and activities: Times Square, Central Park, Statue of Liberty, Broadway shows\n\
Local cuisine and food recommendations: Pizza, Bagels, Food trucks, Diverse international cuisine\n\
Transportation tips: Subway runs 24/7, Yellow cabs are abundant\n\
Cultural highlights and customs: Fast-paced lifestyle, Arts and theater scene, Shopping\n\
Estimated daily budget (in USD): $200-250\n\
Safety tips: Stay aware in busy areas, Keep belongings close\n\
Local weather and climate: Hot summers, Cold winters, Pleasant spring and fall",
        attractions: "Top Attractions in New York City:\n\
1. Statue of Liberty - Iconic symbol of freedom and democracy\n\
2. Central Park - Massive urban park with various attractions\n\
3. Times Square - Bustling entertainment and commercial intersection\n\
4. Empire State Building - Historic skyscraper with observation deck\n\
5. Metropolitan Museum of Art - World-class art collection\n\
6. Broadway - Home to world-famous theater productions\n\
7. 9/11 Memorial & Museum - Moving tribute to the 2001 tragedy\n\
8. High Line - Elevated park built on former railway tracks\n\
9. Brooklyn Bridge - Historic bridge with amazing city views\n\
10. Rockefeller Center - Art Deco complex with observation deck",
    },
    KnownDestination {
        name: "Bali",
        description: "A tropical paradise known for its beautiful beaches, vibrant culture, and spiritual atmosphere.",
        details: "Best time to visit: April-October (dry season)\n\
Popular attractions and activities: Uluwatu Temple, Ubud Monkey Forest, Rice terraces, Nusa Penida island\n\
Local cuisine and food recommendations: Nasi Goreng, Satay Lilit, Fresh seafood, Traditional warungs\n\
Transportation tips: Rent a scooter, Use Grab/Gojek apps, Book reliable drivers\n\
Cultural highlights and customs: Temple etiquette, Traditional dances, Local ceremonies\n\
Estimated daily budget (in USD): $50-100\n\
Safety tips: Use reputable transport, Respect local customs, Stay hydrated\n\
Local weather and climate: Tropical climate, Dry and wet seasons, Consistently warm",
        attractions: "Top Attractions in Bali:\n\
1. Tanah Lot Temple - Ancient sea temple perched on a rock formation\n\
2. Uluwatu Temple - Clifftop temple known for Kecak fire dance\n\
3. Ubud Monkey Forest - Sacred forest with temples and monkeys\n\
4. Tegalalang Rice Terraces - Stunning terraced rice paddies\n\
5. Nusa Penida Island - Beautiful beaches and natural formations\n\
6. Sacred Monkey Forest - Nature reserve and Hindu temple complex\n\
7. Mount Batur - Active volcano offering sunrise trekking\n\
8. Seminyak Beach - Trendy beach area with sunset views\n\
9. Ubud Art Market - Traditional market selling local crafts\n\
10. Tirta Empul - Holy water temple with purification pools",
    },
    KnownDestination {
        name: "Rome",
        description: "The Eternal City, home to ancient ruins, artistic masterpieces, and world-renowned cuisine.",
        details: "Best time to visit: March-May, September-November\n\
Popular attractions and activities: Colosseum, Vatican Museums, Roman Forum, Trevi Fountain\n\
Local cuisine and food recommendations: Pasta alla Carbonara, Pizza al Taglio, Gelato, Local wine\n\
Transportation tips: Metro system is efficient, Walking in historic center, Valid bus tickets\n\
Cultural highlights and customs: Aperitivo culture, Dress codes for churches, Late dinners\n\
Estimated daily budget (in USD): $150-200\n\
Safety tips: Watch for pickpockets, Validate transport tickets, Avoid tourist scams\n\
Local weather and climate: Hot summers, Mild winters, Pleasant spring and autumn",
        attractions: "Top Attractions in Rome:\n\
1. Colosseum - Ancient amphitheater and icon of Rome\n\
2. Vatican Museums - Vast museum complex including Sistine Chapel\n\
3. Roman Forum - Ruins of ancient Rome's main marketplace\n\
4. Pantheon - Former Roman temple with perfect dome\n\
5. Trevi Fountain - Baroque fountain famous for coin tossing\n\
6. Spanish Steps - Monumental staircase and popular meeting place\n\
7. St. Peter's Basilica - Center of the Catholic Church\n\
8. Borghese Gallery - Art museum in beautiful gardens\n\
9. Piazza Navona - Beautiful square with three fountains\n\
10. Catacombs - Ancient underground burial tunnels",
    },
];
